use egonet_pairs::egonet::parse_egonet;
use egonet_pairs::pairs::PairFeatureBuilder;
use egonet_pairs::profile::{ProfileIndex, Profiles};
use egonet_pairs::table::{read_registry, write_table};

const PROFILES: &str = "\
100 gender;male locale;en_US id;100
11 gender;female locale;en_US hometown;id;5 work;employer;name;Acme work;employer;id;3 work;employer;id;4
12 gender;male locale;en_GB hometown;id;5 work;employer;id;4
13 gender;male locale;en_US hometown;id;6 work;employer;id;3 work;employer;id;4
14 locale;en_US
";

const EGONET: &str = "\
11: 12 13 14
12: 11 13 205
13: 11 12
14: 11 205
";

fn table(profiles: &Profiles) -> String {
    let connectivity = parse_egonet(EGONET.as_bytes()).unwrap();
    let builder = PairFeatureBuilder::new(&connectivity, profiles);
    let mut buffer = Vec::new();
    write_table(&mut buffer, profiles.registry(), builder.rows()).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn full_table_for_a_small_egonet() {
    let connectivity = parse_egonet(EGONET.as_bytes()).unwrap();
    let profiles = ProfileIndex::parse(PROFILES.as_bytes()).unwrap()
        .restrict_to(connectivity.friends())
        .unwrap();
    assert_eq!(table(&profiles), "\
pair,edge,common_friends,gender,hometown;id,locale,work;employer;id
11;12,TRUE,1,0,1,0,1
11;13,TRUE,1,0,0,1,2
11;14,TRUE,0,0,0,1,0
12;13,TRUE,1,1,0,0,1
12;14,FALSE,1,0,0,0,0
13;14,FALSE,1,0,0,1,0
");
}

#[test]
fn emitted_header_recovers_the_registry() {
    let connectivity = parse_egonet(EGONET.as_bytes()).unwrap();
    let profiles = Profiles::scan(PROFILES.as_bytes(), connectivity.friends()).unwrap();
    let recovered = read_registry(table(&profiles).as_bytes()).unwrap();
    assert_eq!(&recovered, profiles.registry());
}
