//! Interactive reader

use super::AppContext;
use anyhow::{bail, Result};
use lectern_core::reader::{
    AutoPlay, Direction, PageView, Position, Reader, ReaderOptions, TurnOutcome,
};
use lectern_core::{Language, LanguageSelection, Toggle};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  n, <enter>   next verse
  p            previous verse
  g C:V        go to chapter C, verse V
  b            toggle a bookmark on this verse
  r            reload this chapter
  l LANGUAGE   toggle a display language
  a            toggle autoplay
  s SECONDS    set the autoplay interval (1-10)
  h            show this help
  q            quit";

/// One line typed at the reader prompt
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReadCommand {
    Turn(Direction),
    GoTo(Position),
    Bookmark,
    Reload,
    Language(Language),
    Autoplay,
    Speed(u64),
    Help,
    Quit,
}

impl ReadCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head.to_lowercase().as_str() {
            "" | "n" | "next" => Ok(ReadCommand::Turn(Direction::Forward)),
            "p" | "prev" | "previous" => Ok(ReadCommand::Turn(Direction::Backward)),
            "g" | "goto" => parse_position(rest).map(ReadCommand::GoTo),
            "b" | "bookmark" => Ok(ReadCommand::Bookmark),
            "r" | "reload" => Ok(ReadCommand::Reload),
            "l" | "lang" | "language" => rest.parse().map(ReadCommand::Language),
            "a" | "autoplay" => Ok(ReadCommand::Autoplay),
            "s" | "speed" => rest
                .parse()
                .map(ReadCommand::Speed)
                .map_err(|_| format!("'{}' is not a number of seconds", rest)),
            "h" | "help" | "?" => Ok(ReadCommand::Help),
            "q" | "quit" | "exit" => Ok(ReadCommand::Quit),
            other => Err(format!("unknown command '{}' (h for help)", other)),
        }
    }
}

/// Accepts `2:5`, `2 5` or a bare chapter `2`
fn parse_position(s: &str) -> Result<Position, String> {
    let parts: Vec<&str> = s
        .split(|c: char| c == ':' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    let number = |p: &str| {
        p.parse::<u32>()
            .map_err(|_| format!("'{}' is not a chapter:verse position", s))
    };
    match parts.as_slice() {
        [chapter] => Ok(Position::new(number(chapter)?, 1)),
        [chapter, verse] => Ok(Position::new(number(chapter)?, number(verse)?)),
        _ => Err(format!("'{}' is not a chapter:verse position", s)),
    }
}

fn print_page(page: &PageView) {
    let marker = if page.bookmarked { " [bookmarked]" } else { "" };
    println!();
    println!("{} {}{}", page.text_code, page.heading(), marker);
    match &page.verse {
        Some(verse) => {
            for line in &verse.lines {
                println!("{}: {}", line.label, line.text);
            }
            if let Some(url) = &verse.audio_url {
                println!("Audio: {}", url);
            }
        }
        None if page.load_failed => println!("(could not load this chapter; r to retry)"),
        None => println!("(no verses in this chapter)"),
    }
}

fn report(outcome: TurnOutcome) {
    match outcome {
        TurnOutcome::StartOfText => println!("Already at the first verse"),
        TurnOutcome::EndOfText => println!("End of text"),
        TurnOutcome::NoVerses => println!("No verses in this chapter"),
        TurnOutcome::LoadFailed => println!("Could not load the next chapter; try again"),
        TurnOutcome::Ignored
        | TurnOutcome::Superseded
        | TurnOutcome::Moved
        | TurnOutcome::ChapterChanged => {}
    }
}

/// Read a text page by page from the terminal
///
/// Commands come from stdin, one per line. When stdin closes the reader
/// exits, unless autoplay is running; then it keeps turning pages until the
/// end of the text.
pub async fn read(
    ctx: &AppContext,
    code: &str,
    start: Position,
    languages: Option<&str>,
    autoplay: bool,
    speed: Option<u64>,
) -> Result<()> {
    let mut options = ReaderOptions::from_config(&ctx.config);
    if let Some(list) = languages {
        let selection = LanguageSelection::parse_list(list).map_err(anyhow::Error::msg)?;
        options = options.with_languages(selection);
    }

    let reader = Arc::new(
        Reader::open(ctx.catalog.clone(), ctx.storage.clone(), code, start, options).await,
    );
    if reader.chapters().is_empty() && reader.verses().is_empty() {
        bail!("No verses found for '{}'", code);
    }

    let mut player =
        AutoPlay::new(reader.clone()).with_speed(speed.unwrap_or(ctx.config.autoplay_seconds));
    let mut positions = reader.subscribe();
    positions.borrow_and_update();
    print_page(&reader.page());

    if autoplay {
        player.set_enabled(true);
        println!("Autoplay on ({}s per verse)", player.speed());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            biased;

            changed = positions.changed() => {
                if changed.is_err() {
                    break;
                }
                positions.borrow_and_update();
                print_page(&reader.page());
            }

            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    if !player.is_enabled() {
                        break;
                    }
                    continue;
                };

                let command = match ReadCommand::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };

                match command {
                    ReadCommand::Turn(direction) => report(reader.turn_page(direction).await),
                    ReadCommand::GoTo(position) => {
                        reader.go_to(position.chapter, position.verse).await;
                    }
                    ReadCommand::Reload => {
                        reader.reload().await;
                    }
                    ReadCommand::Bookmark => {
                        let position = reader.position();
                        if reader.toggle_bookmark().await {
                            println!("Bookmarked {}", position);
                        } else {
                            println!("Removed bookmark {}", position);
                        }
                    }
                    ReadCommand::Language(language) => match reader.toggle_language(language) {
                        Toggle::Rejected => println!("At least one language must remain selected"),
                        _ => print_page(&reader.page()),
                    },
                    ReadCommand::Autoplay => {
                        let enabled = player.toggle();
                        println!("Autoplay {}", if enabled { "on" } else { "off" });
                    }
                    ReadCommand::Speed(seconds) => {
                        println!("Autoplay interval {}s", player.set_speed(seconds));
                    }
                    ReadCommand::Help => println!("{}", HELP),
                    ReadCommand::Quit => break,
                }
            }

            // Only reached once stdin has closed during autoplay
            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if !stdin_open && !player.is_enabled() {
                    break;
                }
            }
        }
    }

    player.set_enabled(false);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReadCommand::parse(""), Ok(ReadCommand::Turn(Direction::Forward)));
        assert_eq!(ReadCommand::parse(" P "), Ok(ReadCommand::Turn(Direction::Backward)));
        assert_eq!(
            ReadCommand::parse("g 2:5"),
            Ok(ReadCommand::GoTo(Position::new(2, 5)))
        );
        assert_eq!(
            ReadCommand::parse("goto 3 7"),
            Ok(ReadCommand::GoTo(Position::new(3, 7)))
        );
        assert_eq!(
            ReadCommand::parse("l tamil"),
            Ok(ReadCommand::Language(Language::Tamil))
        );
        assert_eq!(ReadCommand::parse("s 3"), Ok(ReadCommand::Speed(3)));
        assert_eq!(ReadCommand::parse("r"), Ok(ReadCommand::Reload));
        assert_eq!(ReadCommand::parse("q"), Ok(ReadCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(ReadCommand::parse("jump").is_err());
        assert!(ReadCommand::parse("g two").is_err());
        assert!(ReadCommand::parse("s fast").is_err());
        assert!(ReadCommand::parse("l klingon").is_err());
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("4"), Ok(Position::new(4, 1)));
        assert!(parse_position("1:2:3").is_err());
    }
}
