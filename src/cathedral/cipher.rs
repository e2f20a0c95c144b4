//! The Cathedral's runic script. Lore lines marked as carved are shown in
//! runes so the player has to work them out by hand; the engine only ever
//! enciphers.

/// Digraphs take a single rune and are matched before single letters.
const DIGRAPHS: [(&str, char); 3] = [("TH", 'ᚦ'), ("NG", 'ᛜ'), ("EA", 'ᛠ')];

fn rune_for(letter: char) -> Option<char> {
    let rune = match letter {
        'A' => 'ᚪ',
        'B' => 'ᛒ',
        'C' => 'ᚳ',
        'D' => 'ᛞ',
        'E' => 'ᛖ',
        'F' => 'ᚠ',
        'G' => 'ᚷ',
        'H' => 'ᚻ',
        'I' => 'ᛁ',
        'J' => 'ᛄ',
        'K' => 'ᛣ',
        'L' => 'ᛚ',
        'M' => 'ᛗ',
        'N' => 'ᚾ',
        'O' => 'ᛟ',
        'P' => 'ᛈ',
        'Q' => 'ᛢ',
        'R' => 'ᚱ',
        'S' => 'ᛋ',
        'T' => 'ᛏ',
        'U' => 'ᚢ',
        'V' => 'ᚡ',
        'W' => 'ᚹ',
        'X' => 'ᛉ',
        'Y' => 'ᚣ',
        'Z' => 'ᛎ',
        _ => return None,
    };
    Some(rune)
}

/// Encipher plain text. Letters are case-folded; everything else passes through.
pub fn encipher(plain: &str) -> String {
    let upper: Vec<char> = plain.to_uppercase().chars().collect();
    let mut out = String::with_capacity(plain.len() * 3);
    let mut i = 0;
    'outer: while i < upper.len() {
        if i + 1 < upper.len() {
            for (pair, rune) in DIGRAPHS {
                let mut p = pair.chars();
                if p.next() == Some(upper[i]) && p.next() == Some(upper[i + 1]) {
                    out.push(rune);
                    i += 2;
                    continue 'outer;
                }
            }
        }
        out.push(rune_for(upper[i]).unwrap_or(upper[i]));
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carved_warning_matches_the_entrance_sign() {
        assert_eq!(encipher("Beware the"), "ᛒᛖᚹᚪᚱᛖ ᚦᛖ");
    }

    #[test]
    fn digraphs_win_over_letters() {
        assert_eq!(encipher("sing"), "ᛋᛁᛜ");
        assert_eq!(encipher("sea"), "ᛋᛠ");
    }

    #[test]
    fn punctuation_and_digits_pass_through() {
        assert_eq!(encipher("a-1!"), "ᚪ-1!");
    }
}
