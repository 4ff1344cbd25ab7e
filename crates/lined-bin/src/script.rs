//! Textual action decoding and the producer thread feeding the session.
//!
//! One command per line; blank lines and lines starting with `#` are skipped.
//! Text arguments accept the escapes `\n`, `\t`, `\r` and `\\`. Row numbers
//! are 1-based.
//!
//! ```text
//! insert <text>     newline     backspace     delete
//! left  right  up  down  home  end
//! pageup [n]  pagedown [n]  goto <row>
//! paste <text>  dd [n]  reload  quit
//! ```

use anyhow::{Context, Result, anyhow, bail};
use core_state::{Action, Motion};
use crossbeam_channel::Sender;
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use tracing::{debug, info, warn};

/// Rows moved by `pageup`/`pagedown` without an explicit count.
pub const DEFAULT_PAGE_ROWS: usize = 20;

/// One decoded script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Actions(Vec<Action>),
    /// Re-read the document from disk; the producer supplies the bytes.
    Reload,
}

/// Decode one script line. `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<Step>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let (cmd, rest) = match trimmed.split_once(' ') {
        Some((cmd, rest)) => (cmd, rest),
        None => (trimmed, ""),
    };
    let one = |action: Action| Ok(Some(Step::Actions(vec![action])));
    match cmd {
        "insert" => {
            let text = unescape(rest)?;
            if text.is_empty() {
                bail!("insert needs text");
            }
            Ok(Some(Step::Actions(text.chars().map(Action::InsertChar).collect())))
        }
        "paste" => one(Action::Paste(unescape(rest)?)),
        "newline" => one(Action::Newline),
        "backspace" => one(Action::Backspace),
        "delete" => one(Action::DeleteUnder),
        "left" => one(Action::Move(Motion::Left)),
        "right" => one(Action::Move(Motion::Right)),
        "up" => one(Action::Move(Motion::Up)),
        "down" => one(Action::Move(Motion::Down)),
        "home" => one(Action::Move(Motion::LineStart)),
        "end" => one(Action::Move(Motion::LineEnd)),
        "pageup" => one(Action::Move(Motion::PageUp(count(rest, DEFAULT_PAGE_ROWS)?))),
        "pagedown" => one(Action::Move(Motion::PageDown(count(rest, DEFAULT_PAGE_ROWS)?))),
        "goto" => {
            let row: usize = rest
                .trim()
                .parse()
                .with_context(|| format!("goto needs a row number, got {rest:?}"))?;
            one(Action::Move(Motion::Goto(row.saturating_sub(1))))
        }
        "dd" => one(Action::DeleteRows(count(rest, 1)?)),
        "reload" => Ok(Some(Step::Reload)),
        "quit" => one(Action::Quit),
        other => Err(anyhow!("unknown command {other:?}")),
    }
}

fn count(arg: &str, default: usize) -> Result<usize> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Ok(default);
    }
    arg.parse()
        .with_context(|| format!("expected a count, got {arg:?}"))
}

fn unescape(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => bail!("unknown escape \\{other}"),
            None => bail!("dangling backslash"),
        }
    }
    Ok(out)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceExit {
    InputEnded,
    Quit,
    ChannelClosed,
    ReadError,
}

impl SourceExit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceExit::InputEnded => "input_ended",
            SourceExit::Quit => "quit",
            SourceExit::ChannelClosed => "channel_closed",
            SourceExit::ReadError => "read_error",
        }
    }
}

/// Reads script lines and forwards decoded actions. Bad lines are logged and
/// skipped; a closed channel or read error ends the source.
pub struct ScriptSource<R> {
    reader: R,
    reload_from: Option<PathBuf>,
    tx: Sender<Action>,
}

impl<R: BufRead + Send + 'static> ScriptSource<R> {
    pub fn new(reader: R, reload_from: Option<PathBuf>, tx: Sender<Action>) -> Self {
        Self {
            reader,
            reload_from,
            tx,
        }
    }

    pub fn spawn(self) -> Result<thread::JoinHandle<SourceExit>> {
        thread::Builder::new()
            .name("lined-input".into())
            .spawn(move || self.run())
            .context("spawn input thread")
    }

    pub fn run(mut self) -> SourceExit {
        info!(target: "input.script", "script_source_started");
        let mut line = String::new();
        let mut line_no = 0usize;
        let exit = loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => break SourceExit::InputEnded,
                Ok(_) => line_no += 1,
                Err(e) => {
                    warn!(target: "input.script", line = line_no + 1, error = %e, "script_read_failed");
                    break SourceExit::ReadError;
                }
            }
            let step = match parse_line(&line) {
                Ok(Some(step)) => step,
                Ok(None) => continue,
                Err(e) => {
                    warn!(target: "input.script", line = line_no, error = %e, "script_line_rejected");
                    continue;
                }
            };
            let actions = match step {
                Step::Actions(actions) => actions,
                Step::Reload => match self.reload_bytes() {
                    Ok(bytes) => vec![Action::Reload(bytes)],
                    Err(e) => {
                        warn!(target: "input.script", line = line_no, error = %e, "reload_read_failed");
                        continue;
                    }
                },
            };
            let quit = actions.contains(&Action::Quit);
            if actions.into_iter().any(|a| self.tx.send(a).is_err()) {
                break SourceExit::ChannelClosed;
            }
            if quit {
                break SourceExit::Quit;
            }
        };
        info!(target: "input.script", reason = exit.as_str(), lines = line_no, "script_source_stopped");
        exit
    }

    fn reload_bytes(&self) -> Result<Vec<u8>> {
        let path = self
            .reload_from
            .as_ref()
            .ok_or_else(|| anyhow!("no file to reload"))?;
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        debug!(target: "io", file = %path.display(), size = bytes.len(), "file_reloaded");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn actions(line: &str) -> Vec<Action> {
        match parse_line(line).unwrap() {
            Some(Step::Actions(actions)) => actions,
            other => panic!("expected actions, got {other:?}"),
        }
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   \n").unwrap(), None);
        assert_eq!(parse_line("# comment").unwrap(), None);
    }

    #[test]
    fn insert_expands_to_chars_keeping_spaces() {
        assert_eq!(
            actions("insert a b\n"),
            vec![
                Action::InsertChar('a'),
                Action::InsertChar(' '),
                Action::InsertChar('b')
            ]
        );
        assert_eq!(actions("insert \\t"), vec![Action::InsertChar('\t')]);
        assert!(parse_line("insert").is_err());
    }

    #[test]
    fn paste_unescapes_newlines() {
        assert_eq!(actions("paste one\\ntwo"), vec![Action::Paste("one\ntwo".into())]);
        assert!(parse_line("paste bad\\q").is_err());
        assert!(parse_line("paste tail\\").is_err());
    }

    #[test]
    fn counts_and_rows() {
        assert_eq!(actions("dd"), vec![Action::DeleteRows(1)]);
        assert_eq!(actions("dd 3"), vec![Action::DeleteRows(3)]);
        assert_eq!(
            actions("pagedown"),
            vec![Action::Move(Motion::PageDown(DEFAULT_PAGE_ROWS))]
        );
        assert_eq!(actions("pageup 5"), vec![Action::Move(Motion::PageUp(5))]);
        assert_eq!(actions("goto 1"), vec![Action::Move(Motion::Goto(0))]);
        assert_eq!(actions("goto 0"), vec![Action::Move(Motion::Goto(0))]);
        assert!(parse_line("goto").is_err());
        assert!(parse_line("dd x").is_err());
    }

    #[test]
    fn simple_commands() {
        assert_eq!(actions("newline"), vec![Action::Newline]);
        assert_eq!(actions("backspace"), vec![Action::Backspace]);
        assert_eq!(actions("delete"), vec![Action::DeleteUnder]);
        assert_eq!(actions("home"), vec![Action::Move(Motion::LineStart)]);
        assert_eq!(actions("end\r\n"), vec![Action::Move(Motion::LineEnd)]);
        assert_eq!(actions("quit"), vec![Action::Quit]);
        assert_eq!(parse_line("reload").unwrap(), Some(Step::Reload));
        assert!(parse_line("frobnicate").is_err());
    }

    #[test]
    fn source_forwards_until_quit() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let script = "insert hi\nbogus\nreload\nnewline\nquit\ninsert never\n";
        let exit = ScriptSource::new(Cursor::new(script.as_bytes().to_vec()), None, tx).run();
        assert_eq!(exit, SourceExit::Quit);
        let got: Vec<Action> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                Action::InsertChar('h'),
                Action::InsertChar('i'),
                Action::Newline,
                Action::Quit
            ]
        );
    }

    #[test]
    fn source_reloads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "fresh\n").unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        let exit = ScriptSource::new(Cursor::new(b"reload\n".to_vec()), Some(path), tx).run();
        assert_eq!(exit, SourceExit::InputEnded);
        assert_eq!(rx.try_recv().unwrap(), Action::Reload(b"fresh\n".to_vec()));
    }

    #[test]
    fn source_stops_when_session_is_gone() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        let exit = ScriptSource::new(Cursor::new(b"left\n".to_vec()), None, tx).run();
        assert_eq!(exit, SourceExit::ChannelClosed);
    }
}
