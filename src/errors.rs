use error_set::error_set;

error_set!{
    ParseError = {
        #[display("line {line}: expected '<friend id>:' but found '{token}'")]
        MissingColon{line: usize, token: String},
        #[display("line {line}: '{token}' is not a valid user id")]
        InvalidUserId{line: usize, token: String},
        #[display("line {line}: feature token '{token}' has no value component")]
        MissingFeatureValue{line: usize, token: String},
        #[display("header: expected column '{expected}' but found '{found}'")]
        UnexpectedColumn{expected: String, found: String},
    };
    ConfigError = {
        #[display("Directory does not exist or is not a directory: {path}")]
        MissingDirectory{path: String},
        #[display("Ego-network file name is not a numeric ego id: {path}")]
        InvalidEgoFileName{path: String},
        #[display("Ego {ego} has two ego-network files: {first} and {second}")]
        DuplicateEgo{ego: u64, first: String, second: String},
    };
}
