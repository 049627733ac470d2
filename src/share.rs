//! Sharing articles through a platform command, falling back to the clipboard.

use std::process::{Command, Stdio};

use clipboard_rs::Clipboard;

use crate::app::{NewsError, Result};
use crate::domain::Article;

/// What gets shared for one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareData {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareData {
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.display_title().to_string(),
            text: article.description.clone().unwrap_or_default(),
            url: article.url.clone(),
        }
    }

    /// Clipboard payload: title and url on separate lines.
    pub fn clipboard_text(&self) -> String {
        format!("{}\n{}", self.title, self.url)
    }
}

/// How the article ended up being shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMethod {
    Command,
    Clipboard,
}

pub trait ClipboardWriter {
    fn set_text(&self, text: String) -> std::result::Result<(), String>;
}

/// The system clipboard.
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn set_text(&self, text: String) -> std::result::Result<(), String> {
        clipboard_rs::ClipboardContext::new()
            .and_then(|ctx| ctx.set_text(text))
            .map_err(|e| e.to_string())
    }
}

pub struct Sharer<C: ClipboardWriter = SystemClipboard> {
    command: Option<Vec<String>>,
    clipboard: C,
}

impl Sharer<SystemClipboard> {
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self::with_clipboard(command, SystemClipboard)
    }
}

impl<C: ClipboardWriter> Sharer<C> {
    pub fn with_clipboard(command: Option<Vec<String>>, clipboard: C) -> Self {
        let command = command.filter(|argv| !argv.is_empty());
        Self { command, clipboard }
    }

    pub fn share(&self, data: &ShareData) -> Result<ShareMethod> {
        if let Some(argv) = &self.command {
            match run_command(argv, data) {
                Ok(()) => return Ok(ShareMethod::Command),
                Err(e) => tracing::warn!("Share command failed, using clipboard: {}", e),
            }
        }

        self.clipboard
            .set_text(data.clipboard_text())
            .map(|_| ShareMethod::Clipboard)
            .map_err(|e| NewsError::Share(format!("Could not copy to clipboard: {}", e)))
    }
}

fn expand(arg: &str, data: &ShareData) -> String {
    arg.replace("{title}", &data.title)
        .replace("{text}", &data.text)
        .replace("{url}", &data.url)
}

/// Build the command with placeholders expanded. Its stdio is detached so it
/// cannot draw over the terminal UI.
fn share_command(program: &str, args: &[String], data: &ShareData) -> Command {
    let mut command = Command::new(program);
    command
        .args(args.iter().map(|a| expand(a, data)))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

fn run_command(argv: &[String], data: &ShareData) -> Result<()> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| NewsError::Share("empty share command".into()))?;

    let status = share_command(program, args, data).status()?;

    if status.success() {
        Ok(())
    } else {
        Err(NewsError::Share(format!("{} exited with {}", program, status)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryClipboard {
        contents: RefCell<Option<String>>,
        fail: bool,
    }

    impl ClipboardWriter for &MemoryClipboard {
        fn set_text(&self, text: String) -> std::result::Result<(), String> {
            if self.fail {
                return Err("no display".into());
            }
            *self.contents.borrow_mut() = Some(text);
            Ok(())
        }
    }

    fn data() -> ShareData {
        ShareData {
            title: "Rust 2.0 released".into(),
            text: "Big news".into(),
            url: "https://example.com/rust".into(),
        }
    }

    #[test]
    fn test_from_article() {
        let mut article = Article::new("https://example.com/a", "");
        article.description = Some("desc".into());
        let data = ShareData::from_article(&article);
        assert_eq!(data.title, "(Untitled)");
        assert_eq!(data.text, "desc");
        assert_eq!(data.clipboard_text(), "(Untitled)\nhttps://example.com/a");
    }

    #[test]
    fn test_no_command_uses_clipboard() {
        let clipboard = MemoryClipboard::default();
        let sharer = Sharer::with_clipboard(None, &clipboard);

        assert_eq!(sharer.share(&data()).unwrap(), ShareMethod::Clipboard);
        assert_eq!(
            clipboard.contents.borrow().as_deref(),
            Some("Rust 2.0 released\nhttps://example.com/rust")
        );
    }

    #[test]
    fn test_failing_command_falls_back_to_clipboard() {
        let clipboard = MemoryClipboard::default();
        let command = vec!["newshub-no-such-share-binary".to_string(), "{url}".to_string()];
        let sharer = Sharer::with_clipboard(Some(command), &clipboard);

        assert_eq!(sharer.share(&data()).unwrap(), ShareMethod::Clipboard);
        assert!(clipboard.contents.borrow().is_some());
    }

    #[test]
    fn test_clipboard_failure_is_share_error() {
        let clipboard = MemoryClipboard {
            fail: true,
            ..Default::default()
        };
        let sharer = Sharer::with_clipboard(Some(vec![]), &clipboard);

        let err = sharer.share(&data()).unwrap_err();
        assert!(matches!(err, NewsError::Share(_)));
    }

    #[test]
    fn test_share_command_expands_args() {
        let args = vec!["--title".to_string(), "{title}".to_string(), "{url}".to_string()];
        let command = share_command("termux-share", &args, &data());

        assert_eq!(command.get_program(), "termux-share");
        let got: Vec<_> = command.get_args().collect();
        assert_eq!(got, ["--title", "Rust 2.0 released", "https://example.com/rust"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_output_is_not_inherited() {
        let clipboard = MemoryClipboard::default();
        let command = vec!["sh".to_string(), "-c".to_string(), "echo {url}; echo oops >&2".to_string()];
        let sharer = Sharer::with_clipboard(Some(command), &clipboard);

        assert_eq!(sharer.share(&data()).unwrap(), ShareMethod::Command);
        assert!(clipboard.contents.borrow().is_none());
    }

    #[test]
    fn test_expand_placeholders() {
        assert_eq!(
            expand("{title}: {url}", &data()),
            "Rust 2.0 released: https://example.com/rust"
        );
        assert_eq!(expand("--text={text}", &data()), "--text=Big news");
    }
}
