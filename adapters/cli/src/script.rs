//! Line-oriented input scripts replayed through the editor.
//!
//! ```text
//! # select dirt and paint two tiles
//! key 2
//! click 175 225
//! pan right
//! click 10 10
//! right-click 60 60
//! release
//! quit
//! ```

use thiserror::Error;
use underworld_core::PixelPoint;
use underworld_system_editor::{InputEvent, PanDirection};

/// Errors raised while parsing an input script.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The line starts with a word that is not a script command.
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand {
        /// One-based line number.
        line: usize,
        /// Offending command word.
        command: String,
    },
    /// The command's arguments are missing or malformed.
    #[error("line {line}: {message}")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },
}

/// Parses a script into input events, stopping at the first `quit`.
pub(crate) fn parse(source: &str) -> Result<Vec<InputEvent>, ScriptError> {
    let mut events = Vec::new();
    for (number, raw) in source.lines().enumerate() {
        let line = number + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let mut words = content.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let arguments: Vec<&str> = words.collect();

        let event = match command.to_ascii_lowercase().as_str() {
            "key" => InputEvent::DigitKey(parse_digit(line, &arguments)?),
            "click" => InputEvent::PrimaryClick(parse_point(line, &arguments)?),
            "right-click" => InputEvent::SecondaryClick(parse_point(line, &arguments)?),
            "release" => {
                expect_arity(line, &arguments, 0)?;
                InputEvent::KeyReleased
            }
            "pan" => InputEvent::Pan(parse_direction(line, &arguments)?),
            "quit" => break,
            _ => {
                return Err(ScriptError::UnknownCommand {
                    line,
                    command: command.to_owned(),
                })
            }
        };
        events.push(event);
    }
    Ok(events)
}

fn expect_arity(line: usize, arguments: &[&str], expected: usize) -> Result<(), ScriptError> {
    if arguments.len() != expected {
        return Err(ScriptError::Malformed {
            line,
            message: format!("expected {expected} argument(s), got {}", arguments.len()),
        });
    }
    Ok(())
}

fn parse_digit(line: usize, arguments: &[&str]) -> Result<u8, ScriptError> {
    expect_arity(line, arguments, 1)?;
    arguments[0]
        .parse::<u8>()
        .ok()
        .filter(|digit| *digit <= 9)
        .ok_or_else(|| ScriptError::Malformed {
            line,
            message: format!("'{}' is not a digit key", arguments[0]),
        })
}

fn parse_point(line: usize, arguments: &[&str]) -> Result<PixelPoint, ScriptError> {
    expect_arity(line, arguments, 2)?;
    let coordinate = |value: &str| {
        value.parse::<i32>().map_err(|_| ScriptError::Malformed {
            line,
            message: format!("'{value}' is not a pixel coordinate"),
        })
    };
    Ok(PixelPoint::new(
        coordinate(arguments[0])?,
        coordinate(arguments[1])?,
    ))
}

fn parse_direction(line: usize, arguments: &[&str]) -> Result<PanDirection, ScriptError> {
    expect_arity(line, arguments, 1)?;
    match arguments[0].to_ascii_lowercase().as_str() {
        "up" | "w" => Ok(PanDirection::Up),
        "down" | "s" => Ok(PanDirection::Down),
        "left" | "a" => Ok(PanDirection::Left),
        "right" | "d" => Ok(PanDirection::Right),
        other => Err(ScriptError::Malformed {
            line,
            message: format!("'{other}' is not a pan direction"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command_in_order() {
        let events = parse(
            "# header\n\
             key 2\n\
             click 175 225  # paint\n\
             \n\
             pan D\n\
             right-click 1 2\n\
             release\n",
        )
        .expect("valid script");

        assert_eq!(
            events,
            vec![
                InputEvent::DigitKey(2),
                InputEvent::PrimaryClick(PixelPoint::new(175, 225)),
                InputEvent::Pan(PanDirection::Right),
                InputEvent::SecondaryClick(PixelPoint::new(1, 2)),
                InputEvent::KeyReleased,
            ]
        );
    }

    #[test]
    fn quit_ends_the_script() {
        let events = parse("key 1\nquit\nkey 2\nbogus\n").expect("valid script");
        assert_eq!(events, vec![InputEvent::DigitKey(1)]);
    }

    #[test]
    fn reports_line_numbers() {
        assert_eq!(
            parse("key 1\n\njump 3\n"),
            Err(ScriptError::UnknownCommand {
                line: 3,
                command: "jump".to_owned(),
            })
        );
        assert!(matches!(
            parse("key 10"),
            Err(ScriptError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            parse("click 1"),
            Err(ScriptError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            parse("pan sideways"),
            Err(ScriptError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn accepts_negative_click_coordinates() {
        assert_eq!(
            parse("click -5 -10"),
            Ok(vec![InputEvent::PrimaryClick(PixelPoint::new(-5, -10))])
        );
    }
}
