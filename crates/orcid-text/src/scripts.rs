//! Unicode subscript and superscript tables
//!
//! Only characters with a dedicated Unicode glyph are mapped; anything else
//! passes through unchanged.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Subscript Unicode characters
    static ref SUBSCRIPT_MAP: HashMap<char, char> = {
        let mut m = HashMap::new();
        m.insert('0', '₀'); m.insert('1', '₁'); m.insert('2', '₂');
        m.insert('3', '₃'); m.insert('4', '₄'); m.insert('5', '₅');
        m.insert('6', '₆'); m.insert('7', '₇'); m.insert('8', '₈');
        m.insert('9', '₉');
        m.insert('+', '₊'); m.insert('-', '₋'); m.insert('=', '₌');
        m.insert('(', '₍'); m.insert(')', '₎');
        m.insert('a', 'ₐ'); m.insert('e', 'ₑ'); m.insert('h', 'ₕ');
        m.insert('i', 'ᵢ'); m.insert('j', 'ⱼ'); m.insert('k', 'ₖ');
        m.insert('l', 'ₗ'); m.insert('m', 'ₘ'); m.insert('n', 'ₙ');
        m.insert('o', 'ₒ'); m.insert('p', 'ₚ'); m.insert('r', 'ᵣ');
        m.insert('s', 'ₛ'); m.insert('t', 'ₜ'); m.insert('u', 'ᵤ');
        m.insert('v', 'ᵥ'); m.insert('x', 'ₓ');
        m
    };

    /// Superscript Unicode characters
    static ref SUPERSCRIPT_MAP: HashMap<char, char> = {
        let mut m = HashMap::new();
        m.insert('0', '⁰'); m.insert('1', '¹'); m.insert('2', '²');
        m.insert('3', '³'); m.insert('4', '⁴'); m.insert('5', '⁵');
        m.insert('6', '⁶'); m.insert('7', '⁷'); m.insert('8', '⁸');
        m.insert('9', '⁹');
        m.insert('+', '⁺'); m.insert('-', '⁻'); m.insert('=', '⁼');
        m.insert('(', '⁽'); m.insert(')', '⁾');
        m.insert('n', 'ⁿ'); m.insert('i', 'ⁱ');
        m
    };
}

/// Translate every mappable character to its Unicode subscript form
pub fn to_subscript(text: &str) -> String {
    translate(text, &SUBSCRIPT_MAP)
}

/// Translate every mappable character to its Unicode superscript form
pub fn to_superscript(text: &str) -> String {
    translate(text, &SUPERSCRIPT_MAP)
}

fn translate(text: &str, table: &HashMap<char, char>) -> String {
    text.chars()
        .map(|c| table.get(&c).copied().unwrap_or(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscript_digits_and_letters() {
        assert_eq!(to_subscript("2"), "₂");
        assert_eq!(to_subscript("1-x"), "₁₋ₓ");
        assert_eq!(to_subscript("(n+1)"), "₍ₙ₊₁₎");
    }

    #[test]
    fn test_superscript_charge() {
        assert_eq!(to_superscript("2+"), "²⁺");
        assert_eq!(to_superscript("-n"), "⁻ⁿ");
    }

    #[test]
    fn test_unmapped_characters_pass_through() {
        // 'b' has no subscript glyph, 'x' has no superscript glyph in the table
        assert_eq!(to_subscript("b2"), "b₂");
        assert_eq!(to_superscript("x2"), "x²");
        assert_eq!(to_subscript("<i>x</i>"), "<ᵢ>ₓ</ᵢ>");
    }

    #[test]
    fn test_empty() {
        assert_eq!(to_subscript(""), "");
        assert_eq!(to_superscript(""), "");
    }
}
