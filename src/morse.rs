//! Morse code timing patterns
//!
//! Turns text into one on/off level per time unit, ready to be played by a
//! [`PinPattern`](crate::performance::PinPattern). Timing follows the usual
//! convention: dot 1, dash 3, gap inside a letter 1, between letters 3,
//! after a word 7 units.

use heapless::Vec;

const DOT: usize = 1;
const DASH: usize = 3;
const ELEMENT_GAP: usize = 1;
const LETTER_GAP: usize = 3;
const WORD_GAP: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MorseError {
    /// Character has no Morse code
    UnsupportedCharacter(char),
    /// Pattern does not fit into the output buffer
    CapacityExceeded,
}

/// Encode `text` into a timing pattern of at most N units
///
/// Letters are case-insensitive; runs of whitespace count as one word break.
/// Every word, the last one included, is followed by a word gap.
pub fn encode<const N: usize>(text: &str) -> Result<Vec<bool, N>, MorseError> {
    let mut pattern = Vec::new();

    for word in text.split_whitespace() {
        let mut chars = word.chars().peekable();
        while let Some(c) = chars.next() {
            let code = code_of(c).ok_or(MorseError::UnsupportedCharacter(c))?;
            for (i, symbol) in code.bytes().enumerate() {
                if i > 0 {
                    push_run(&mut pattern, false, ELEMENT_GAP)?;
                }
                let len = if symbol == b'.' { DOT } else { DASH };
                push_run(&mut pattern, true, len)?;
            }
            let gap = if chars.peek().is_some() {
                LETTER_GAP
            } else {
                WORD_GAP
            };
            push_run(&mut pattern, false, gap)?;
        }
    }

    Ok(pattern)
}

fn push_run<const N: usize>(
    pattern: &mut Vec<bool, N>,
    level: bool,
    len: usize,
) -> Result<(), MorseError> {
    for _ in 0..len {
        pattern
            .push(level)
            .map_err(|_| MorseError::CapacityExceeded)?;
    }
    Ok(())
}

fn code_of(c: char) -> Option<&'static str> {
    Some(match c.to_ascii_uppercase() {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        _ => return None,
    })
}
