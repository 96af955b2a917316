use anyhow::{bail, Result as AnyResult};
use labyrinth_core::{Command, Direction};

/// Parses a move script into world commands.
///
/// `n`, `e`, `s` and `w` step in a direction; their upper-case forms carve
/// through the wall on that side instead. Whitespace and commas are ignored.
pub(crate) fn parse(script: &str) -> AnyResult<Vec<Command>> {
    let mut commands = Vec::new();

    for (position, symbol) in script.chars().enumerate() {
        if symbol.is_whitespace() || symbol == ',' {
            continue;
        }
        let Some(direction) = direction_for(symbol.to_ascii_lowercase()) else {
            bail!("unknown move '{symbol}' at position {position}");
        };
        commands.push(if symbol.is_ascii_uppercase() {
            Command::AttemptCarve { direction }
        } else {
            Command::AttemptMove { direction }
        });
    }

    Ok(commands)
}

fn direction_for(symbol: char) -> Option<Direction> {
    match symbol {
        'n' => Some(Direction::North),
        'e' => Some(Direction::East),
        's' => Some(Direction::South),
        'w' => Some(Direction::West),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_case_moves_and_upper_case_carves() {
        let commands = parse("e s, W n").expect("valid script");

        assert_eq!(
            commands,
            vec![
                Command::AttemptMove {
                    direction: Direction::East
                },
                Command::AttemptMove {
                    direction: Direction::South
                },
                Command::AttemptCarve {
                    direction: Direction::West
                },
                Command::AttemptMove {
                    direction: Direction::North
                },
            ]
        );
    }

    #[test]
    fn unknown_symbols_are_reported_with_position() {
        let error = parse("ex").expect_err("x is not a move");

        assert_eq!(error.to_string(), "unknown move 'x' at position 1");
        assert!(parse("").expect("empty script").is_empty());
    }
}
