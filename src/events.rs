use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Error;
use crate::viewport::{Pointer, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Move(Pointer),
    Resize(Viewport),
    City(String),
    Render(Option<PathBuf>),
    Quit,
}

fn pair<T: FromStr>(line: &str, args: &str) -> Result<(T, T), Error> {
    let bad = || Error::Config(format!("Expected two numbers in {line:?}"));
    let mut parts = args.split_whitespace();
    let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(bad());
    };
    Ok((a.parse().map_err(|_| bad())?, b.parse().map_err(|_| bad())?))
}

impl FromStr for Event {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, args) = line.split_once(' ').unwrap_or((line, ""));
        let args = args.trim();

        match command {
            "move" => {
                let (x, y): (f64, f64) = pair(line, args)?;
                Ok(Event::Move(Pointer { x, y }))
            }
            "resize" => {
                let (width, height): (u32, u32) = pair(line, args)?;
                if width == 0 || height == 0 {
                    return Err(Error::Config(format!("Empty viewport in {line:?}")));
                }
                Ok(Event::Resize(Viewport { width, height }))
            }
            "city" if !args.is_empty() => Ok(Event::City(args.to_string())),
            "render" if args.is_empty() => Ok(Event::Render(None)),
            "render" => Ok(Event::Render(Some(PathBuf::from(args)))),
            "quit" | "exit" => Ok(Event::Quit),
            _ => Err(Error::Config(format!("Unknown event {line:?}"))),
        }
    }
}
