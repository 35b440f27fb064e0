use std::io::BufRead;
use std::path::Path;
use anyhow::Context;
use crate::errors::ParseError;
use crate::graph::{Connectivity, ConnectivityBuilder, UserId};

/// One `FRIEND_ID: MUTUAL_ID MUTUAL_ID ...` line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AdjacencyLine {
    friend: UserId,
    mutuals: Vec<UserId>
}

pub(crate) fn parse_user_id(line: usize, token: &str) -> Result<UserId, ParseError> {
    token.parse::<UserId>()
        .map_err(|_| ParseError::InvalidUserId { line, token: token.to_string() })
}

impl AdjacencyLine {
    fn parse(line: usize, text: &str) -> Result<Option<Self>, ParseError> {
        let mut tokens = text.split_whitespace();
        let Some(head) = tokens.next() else {
            return Ok(None);
        };
        let friend = head.strip_suffix(':')
            .ok_or_else(|| ParseError::MissingColon { line, token: head.to_string() })?;
        let friend = parse_user_id(line, friend)?;
        let mutuals = tokens
            .map(|token| parse_user_id(line, token))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(AdjacencyLine { friend, mutuals }))
    }
}

pub fn parse_egonet(reader: impl BufRead) -> anyhow::Result<Connectivity> {
    let mut builder = ConnectivityBuilder::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(parsed) = AdjacencyLine::parse(index + 1, &line)? else {
            continue;
        };
        builder.add_friend_in_place(parsed.friend);
        for mutual in parsed.mutuals {
            if mutual == parsed.friend {
                log::debug!("Ignoring self-edge for {} on line {}", mutual, index + 1);
                continue;
            }
            builder.add_edge_in_place(parsed.friend, mutual);
        }
    }
    Ok(builder.build())
}

pub fn load_egonet(path: impl AsRef<Path>) -> anyhow::Result<Connectivity> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open ego-network {}", path.display()))?;
    parse_egonet(std::io::BufReader::new(file))
        .with_context(|| format!("While parsing ego-network {}", path.display()))
}
