//! Streaming decoder for controller output
//!
//! Turns bytes written by a [`TerminalController`](crate::TerminalController)
//! back into text runs and [`EscapeSequence`]s. It understands exactly the
//! sequences the encoder produces; any other escape is passed through as
//! [`Segment::Unrecognized`].
//!
//! The decoder is a small subset of the VT500-series state machine
//! (<https://vt100.net/emu/dec_ansi_parser>): Ground, Escape and CsiParam.
//! Input may be split at arbitrary chunk boundaries.

use crate::color::Color;
use crate::escape::EscapeSequence;

/// Upper bound on collected parameter bytes before a sequence is abandoned
const MAX_PARAM_BYTES: usize = 16;

/// One decoded piece of output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Printable text (including lone line feeds and other C0 bytes)
    Text(String),
    /// A recognized control operation
    Sequence(EscapeSequence),
    /// An escape sequence the encoder never emits, raw bytes included
    Unrecognized(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    CsiParam,
}

/// Incremental decoder state
#[derive(Debug)]
pub struct Decoder {
    state: State,
    /// Pending text bytes (decoded lossily when flushed)
    text: Vec<u8>,
    /// Raw bytes of the escape currently being collected
    raw: Vec<u8>,
    /// Parameter bytes between `ESC[` and the final byte
    params: Vec<u8>,
    /// A carriage return waiting to see if a line feed follows
    pending_cr: bool,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            text: Vec::with_capacity(64),
            raw: Vec::with_capacity(8),
            params: Vec::with_capacity(4),
            pending_cr: false,
        }
    }

    /// Decode a complete buffer in one go
    pub fn decode(data: &[u8]) -> Vec<Segment> {
        let mut decoder = Self::new();
        let mut segments = decoder.feed(data);
        segments.extend(decoder.finish());
        segments
    }

    /// Process a chunk of bytes.
    ///
    /// Text is only emitted when a control byte ends it or on
    /// [`Decoder::finish`], so a run split across chunks stays in one segment.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Segment> {
        let mut out = Vec::new();
        for &byte in data {
            self.process_byte(byte, &mut out);
        }
        out
    }

    /// Flush whatever is buffered, including an unterminated escape
    pub fn finish(&mut self) -> Vec<Segment> {
        let mut out = Vec::new();
        if self.pending_cr {
            self.pending_cr = false;
            out.push(Segment::Sequence(EscapeSequence::CarriageReturn));
        }
        if self.state != State::Ground {
            self.abandon(&mut out);
        }
        self.flush_text(&mut out);
        out
    }

    fn process_byte(&mut self, byte: u8, out: &mut Vec<Segment>) {
        match self.state {
            State::Ground => self.process_ground(byte, out),
            State::Escape => self.process_escape(byte, out),
            State::CsiParam => self.process_csi_param(byte, out),
        }
    }

    fn process_ground(&mut self, byte: u8, out: &mut Vec<Segment>) {
        if self.pending_cr {
            self.pending_cr = false;
            if byte == b'\n' {
                out.push(Segment::Sequence(EscapeSequence::Newline));
                return;
            }
            out.push(Segment::Sequence(EscapeSequence::CarriageReturn));
        }

        match byte {
            0x1B => {
                self.flush_text(out);
                self.raw.clear();
                self.raw.push(byte);
                self.params.clear();
                self.state = State::Escape;
            }
            b'\r' => {
                self.flush_text(out);
                self.pending_cr = true;
            }
            _ => self.text.push(byte),
        }
    }

    fn process_escape(&mut self, byte: u8, out: &mut Vec<Segment>) {
        self.raw.push(byte);
        if byte == b'[' {
            self.state = State::CsiParam;
        } else {
            self.abandon(out);
        }
    }

    fn process_csi_param(&mut self, byte: u8, out: &mut Vec<Segment>) {
        self.raw.push(byte);
        match byte {
            b'0'..=b'9' | b';' if self.params.len() < MAX_PARAM_BYTES => self.params.push(byte),
            0x40..=0x7E => {
                let segment = match self.dispatch(byte) {
                    Some(seq) => Segment::Sequence(seq),
                    None => Segment::Unrecognized(std::mem::take(&mut self.raw)),
                };
                out.push(segment);
                self.raw.clear();
                self.state = State::Ground;
            }
            _ => self.abandon(out),
        }
    }

    /// Map a complete CSI sequence to an operation
    fn dispatch(&self, final_byte: u8) -> Option<EscapeSequence> {
        let params = std::str::from_utf8(&self.params).ok()?;
        if params.contains(';') {
            return None;
        }
        let value: Option<u16> = if params.is_empty() {
            None
        } else {
            Some(params.parse().ok()?)
        };

        match final_byte {
            b'm' => match value {
                None | Some(0) => Some(EscapeSequence::Reset),
                Some(code) => {
                    let code = u8::try_from(code).ok()?;
                    Color::from_code(code).map(EscapeSequence::SetColor)
                }
            },
            b'K' if value == Some(2) => Some(EscapeSequence::ClearLine),
            // CUU with no parameter defaults to 1
            b'A' => Some(EscapeSequence::CursorUp(value.unwrap_or(1))),
            _ => None,
        }
    }

    /// Give up on the current escape, reporting its raw bytes
    fn abandon(&mut self, out: &mut Vec<Segment>) {
        out.push(Segment::Unrecognized(std::mem::take(&mut self.raw)));
        self.params.clear();
        self.state = State::Ground;
    }

    fn flush_text(&mut self, out: &mut Vec<Segment>) {
        if !self.text.is_empty() {
            let text = String::from_utf8_lossy(&self.text).into_owned();
            self.text.clear();
            out.push(Segment::Text(text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: EscapeSequence) -> Segment {
        Segment::Sequence(s)
    }

    fn text(s: &str) -> Segment {
        Segment::Text(s.to_string())
    }

    #[test]
    fn test_decode_wrapped_text() {
        let segments = Decoder::decode(b"\x1b[31mhello\x1b[0m");
        assert_eq!(
            segments,
            vec![
                seq(EscapeSequence::SetColor(Color::Red)),
                text("hello"),
                seq(EscapeSequence::Reset),
            ]
        );
    }

    #[test]
    fn test_decode_clear_line() {
        let segments = Decoder::decode(b"\x1b[2K\r");
        assert_eq!(
            segments,
            vec![
                seq(EscapeSequence::ClearLine),
                seq(EscapeSequence::CarriageReturn)
            ]
        );
    }

    #[test]
    fn test_decode_newline_vs_carriage_return() {
        assert_eq!(Decoder::decode(b"\r\n"), vec![seq(EscapeSequence::Newline)]);
        assert_eq!(
            Decoder::decode(b"a\rb"),
            vec![text("a"), seq(EscapeSequence::CarriageReturn), text("b")]
        );
        assert_eq!(Decoder::decode(b"a\nb"), vec![text("a\nb")]);
    }

    #[test]
    fn test_decode_cursor_up() {
        assert_eq!(
            Decoder::decode(b"\x1b[3A"),
            vec![seq(EscapeSequence::CursorUp(3))]
        );
        assert_eq!(
            Decoder::decode(b"\x1b[0A"),
            vec![seq(EscapeSequence::CursorUp(0))]
        );
        assert_eq!(
            Decoder::decode(b"\x1b[A"),
            vec![seq(EscapeSequence::CursorUp(1))]
        );
    }

    #[test]
    fn test_decode_bare_sgr_is_reset() {
        assert_eq!(Decoder::decode(b"\x1b[m"), vec![seq(EscapeSequence::Reset)]);
    }

    #[test]
    fn test_chunk_boundaries() {
        let mut decoder = Decoder::new();
        let mut segments = decoder.feed(b"\x1b[3");
        assert!(segments.is_empty());
        segments.extend(decoder.feed(b"2mgr"));
        segments.extend(decoder.feed(b"een\x1b"));
        segments.extend(decoder.feed(b"[0m\r"));
        segments.extend(decoder.feed(b"\n"));
        segments.extend(decoder.finish());
        assert_eq!(
            segments,
            vec![
                seq(EscapeSequence::SetColor(Color::Green)),
                text("green"),
                seq(EscapeSequence::Reset),
                seq(EscapeSequence::Newline),
            ]
        );
    }

    #[test]
    fn test_unrecognized_sequences() {
        assert_eq!(
            Decoder::decode(b"\x1b[1;31m"),
            vec![Segment::Unrecognized(b"\x1b[1;31m".to_vec())]
        );
        assert_eq!(
            Decoder::decode(b"\x1b[2J"),
            vec![Segment::Unrecognized(b"\x1b[2J".to_vec())]
        );
        assert_eq!(
            Decoder::decode(b"\x1b7x"),
            vec![Segment::Unrecognized(b"\x1b7".to_vec()), text("x")]
        );
    }

    #[test]
    fn test_unterminated_escape_flushed_on_finish() {
        assert_eq!(
            Decoder::decode(b"ok\x1b[3"),
            vec![text("ok"), Segment::Unrecognized(b"\x1b[3".to_vec())]
        );
    }

    #[test]
    fn test_every_color_decodes() {
        for color in Color::ALL.into_iter().filter(|c| !c.is_pass_through()) {
            let encoded = EscapeSequence::SetColor(color).encode();
            assert_eq!(
                Decoder::decode(encoded.as_bytes()),
                vec![seq(EscapeSequence::SetColor(color))]
            );
        }
    }
}
