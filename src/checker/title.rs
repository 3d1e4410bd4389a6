// src/checker/title.rs
// =============================================================================
// This module pulls the page title out of a response body.
//
// How it works:
// 1. Feed body chunks to html5ever's tokenizer as they arrive (no DOM is built)
// 2. Wait for the first <title> start tag
// 3. The text right after it is the title, returned verbatim
// 4. If the body ends before that happens, the title is ""
//
// Reading stops as soon as the title is known; the rest of the body is never
// downloaded. A missing title or broken markup is not an error, the page just
// has an empty title.
//
// The standalone tokenizer does not know which elements hold raw text (the
// tree builder normally tells it), so the sink switches it into the right
// raw-text state itself. That keeps `<title>` text from being parsed as
// markup and a `<title>` inside a <script> from being matched.
//
// Rust concepts:
// - Traits: TokenSink is html5ever's callback interface for tokens
// - Option::take: move the finished title out without cloning
// =============================================================================

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tracing::debug;

use super::http::Body;

// Receives tokens from html5ever and remembers the first title
#[derive(Debug, Default)]
struct TitleSink {
    // Text collected since the <title> start tag
    in_title: Option<String>,
    title: Option<String>,
}

// Which raw-text state the tokenizer must switch to after this start tag
//
// Title text uses Rawtext rather than Rcdata so character references stay
// as written.
fn raw_kind(tag: &Tag) -> Option<RawKind> {
    match &*tag.name {
        "title" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
            Some(RawKind::Rawtext)
        }
        "textarea" => Some(RawKind::Rcdata),
        "script" => Some(RawKind::ScriptData),
        _ => None,
    }
}

impl TokenSink for TitleSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::ParseError(_) => TokenSinkResult::Continue,
            // html5ever may split one text run into several tokens
            Token::CharacterTokens(text) => {
                if let Some(title) = self.in_title.as_mut() {
                    title.push_str(&text);
                }
                TokenSinkResult::Continue
            }
            token => {
                if let Some(title) = self.in_title.take() {
                    self.title.get_or_insert(title);
                    return TokenSinkResult::Continue;
                }
                if self.title.is_some() {
                    return TokenSinkResult::Continue;
                }
                match token {
                    Token::TagToken(tag) if tag.kind == TagKind::StartTag && !tag.self_closing => {
                        if &*tag.name == "title" {
                            self.in_title = Some(String::new());
                        }
                        match raw_kind(&tag) {
                            Some(kind) => TokenSinkResult::RawData(kind),
                            None => TokenSinkResult::Continue,
                        }
                    }
                    _ => TokenSinkResult::Continue,
                }
            }
        }
    }
}

// Number of bytes at the end of `bytes` that start a UTF-8 sequence the
// chunk did not finish
fn incomplete_utf8_tail(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let byte = bytes[bytes.len() - back];
        if byte & 0b1100_0000 == 0b1000_0000 {
            // continuation byte, keep looking for the lead byte
            continue;
        }
        let width = match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if width > back { back } else { 0 };
    }
    0
}

/// Push-fed title search, for bodies that arrive in chunks
///
/// The tokenizer keeps its state between chunks, so every byte of the body
/// is looked at once, no matter how it is split.
pub struct TitleScanner {
    tokenizer: Tokenizer<TitleSink>,
    queue: BufferQueue,
    // Bytes of a UTF-8 character split across chunks
    carry: Vec<u8>,
}

impl Default for TitleScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleScanner {
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(TitleSink::default(), TokenizerOpts::default()),
            queue: BufferQueue::default(),
            carry: Vec::new(),
        }
    }

    /// Feeds one chunk. Returns true once the title is known and no more
    /// input is needed.
    pub fn push(&mut self, chunk: &[u8]) -> bool {
        if self.is_done() {
            return true;
        }

        self.carry.extend_from_slice(chunk);
        let complete = self.carry.len() - incomplete_utf8_tail(&self.carry);
        let text = String::from_utf8_lossy(&self.carry[..complete]).into_owned();
        self.carry.drain(..complete);

        self.feed(text);
        self.is_done()
    }

    /// Ends the input and returns the title ("" when there was none)
    pub fn finish(mut self) -> String {
        if !self.is_done() {
            if !self.carry.is_empty() {
                let rest = String::from_utf8_lossy(&self.carry).into_owned();
                self.feed(rest);
            }
            self.tokenizer.end();
        }
        self.tokenizer.sink.title.take().unwrap_or_default()
    }

    fn feed(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        self.queue.push_back(StrTendril::from(text));
        let _ = self.tokenizer.feed(&mut self.queue);
    }

    fn is_done(&self) -> bool {
        self.tokenizer.sink.title.is_some()
    }
}

/// Reads `body` until the title is found or the body ends
///
/// A read error part way through gives an empty title.
pub async fn extract_title(body: &mut dyn Body) -> String {
    let mut scanner = TitleScanner::new();
    loop {
        match body.next_chunk().await {
            Ok(Some(chunk)) => {
                if scanner.push(&chunk) {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "body read failed, using empty title");
                return String::new();
            }
        }
    }
    scanner.finish()
}
