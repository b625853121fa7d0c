//! Property-based invariant tests for the encoder, decoder and controller.
//!
//! 1. `wrap` equals the bytes `write` emits, for every color and text.
//! 2. Without color capability, `write` emits text verbatim.
//! 3. Encoded sequences decode back to the same operation.
//! 4. Wrapped text decodes to SetColor, the text, Reset.
//! 5. Repeated `clear_line` calls produce identical, uncontaminated output.
//! 6. Output order follows call order.

use std::collections::HashMap;

use proptest::prelude::*;
use termctl::{Color, ColorMode, Decoder, EscapeSequence, Segment, TerminalController};

// ── Helpers ─────────────────────────────────────────────────────────────

fn color_strategy() -> impl Strategy<Value = Color> {
    prop::sample::select(Color::ALL.to_vec())
}

fn visible_color_strategy() -> impl Strategy<Value = Color> {
    prop::sample::select(
        Color::ALL
            .into_iter()
            .filter(|c| !c.is_pass_through())
            .collect::<Vec<_>>(),
    )
}

/// Text with no control bytes, so decoding sees it as one run
fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:;!?-]{0,40}"
}

fn sequence_strategy() -> impl Strategy<Value = EscapeSequence> {
    prop_oneof![
        visible_color_strategy().prop_map(EscapeSequence::SetColor),
        Just(EscapeSequence::Reset),
        Just(EscapeSequence::ClearLine),
        any::<u16>().prop_map(EscapeSequence::CursorUp),
        Just(EscapeSequence::CarriageReturn),
        Just(EscapeSequence::Newline),
    ]
}

/// A color-capable controller over a temp file, read back after writing
fn forced_color_output(ops: impl FnOnce(&mut TerminalController<&mut std::fs::File>)) -> String {
    use std::io::{Read, Seek, SeekFrom};

    let mut file = tempfile::tempfile().unwrap();
    {
        let env: HashMap<String, String> = HashMap::new();
        let mut term = TerminalController::with_mode(&mut file, ColorMode::Always, &env).unwrap();
        ops(&mut term);
    }
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

// ═════════════════════════════════════════════════════════════════════════
// 1. wrap agrees with write
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wrap_equals_written_bytes(text in ".{0,40}", color in color_strategy()) {
        let mut wrapped = String::new();
        let written = forced_color_output(|term| {
            wrapped = term.wrap(&text, color);
            term.write(&text, color).unwrap();
        });
        prop_assert_eq!(&written, &wrapped);
        if color.is_pass_through() {
            prop_assert_eq!(written, text);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. No capability, no escape codes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn detached_write_is_verbatim(text in ".{0,40}", color in color_strategy()) {
        let mut term = TerminalController::detached(Vec::new());
        prop_assert_eq!(term.wrap(&text, color), text.clone());
        term.write(&text, color).unwrap();
        prop_assert_eq!(term.into_inner(), text.into_bytes());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Encode then decode recovers the operation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sequence_round_trip(seq in sequence_strategy()) {
        let encoded = seq.encode();
        prop_assert_eq!(Decoder::decode(encoded.as_bytes()), vec![Segment::Sequence(seq)]);
    }
}

proptest! {
    #[test]
    fn sequence_round_trip_byte_at_a_time(seq in sequence_strategy()) {
        let encoded = seq.encode();
        let mut decoder = Decoder::new();
        let mut segments = Vec::new();
        for byte in encoded.as_bytes() {
            segments.extend(decoder.feed(std::slice::from_ref(byte)));
        }
        segments.extend(decoder.finish());
        prop_assert_eq!(segments, vec![Segment::Sequence(seq)]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Wrapped text decodes to its parts
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wrapped_text_decodes(text in text_strategy(), color in visible_color_strategy()) {
        let wrapped = termctl::escape::wrap(&text, color);
        let mut expected = vec![Segment::Sequence(EscapeSequence::SetColor(color))];
        if !text.is_empty() {
            expected.push(Segment::Text(text.clone()));
        }
        expected.push(Segment::Sequence(EscapeSequence::Reset));
        prop_assert_eq!(Decoder::decode(wrapped.as_bytes()), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. clear_line is idempotent per call
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clear_line_repeats_identically(count in 1usize..8) {
        let mut term = TerminalController::detached(Vec::new());
        for _ in 0..count {
            term.clear_line().unwrap();
        }
        prop_assert_eq!(term.into_inner(), "\x1b[2K\r".repeat(count).into_bytes());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Output order follows call order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn calls_concatenate_in_order(
        parts in prop::collection::vec((text_strategy(), color_strategy(), 0u16..50), 1..6)
    ) {
        let mut expected = String::new();
        let written = forced_color_output(|term| {
            for (text, color, up) in &parts {
                expected.push_str(&term.wrap(text, *color));
                term.write(text, *color).unwrap();
                expected.push_str(&format!("\x1b[{up}A"));
                term.move_cursor_up(*up).unwrap();
                expected.push_str("\r\n");
                term.end_line().unwrap();
            }
        });
        prop_assert_eq!(written, expected);
    }
}
