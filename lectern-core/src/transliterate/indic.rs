//! Offline romanisation of Malayalam and Tamil script (ISO 15919 letters)

use super::Transliterator;
use crate::error::TransliterationError;
use crate::types::Language;
use async_trait::async_trait;

/// How a code point of an abugida script behaves
#[derive(Debug, Clone, Copy, PartialEq)]
enum Glyph {
    /// Independent vowel
    Vowel(&'static str),
    /// Consonant carrying the inherent `a`
    Consonant(&'static str),
    /// Dependent vowel sign replacing the inherent `a`
    Sign(&'static str),
    /// Suppresses the inherent `a`
    Virama,
    /// Letter with no inherent vowel (anusvara, visarga, chillu, digits)
    Final(&'static str),
}

fn malayalam(c: char) -> Option<Glyph> {
    use Glyph::*;
    let glyph = match c {
        'അ' => Vowel("a"),
        'ആ' => Vowel("ā"),
        'ഇ' => Vowel("i"),
        'ഈ' => Vowel("ī"),
        'ഉ' => Vowel("u"),
        'ഊ' => Vowel("ū"),
        'ഋ' => Vowel("r̥"),
        'എ' => Vowel("e"),
        'ഏ' => Vowel("ē"),
        'ഐ' => Vowel("ai"),
        'ഒ' => Vowel("o"),
        'ഓ' => Vowel("ō"),
        'ഔ' => Vowel("au"),
        'ക' => Consonant("k"),
        'ഖ' => Consonant("kh"),
        'ഗ' => Consonant("g"),
        'ഘ' => Consonant("gh"),
        'ങ' => Consonant("ṅ"),
        'ച' => Consonant("c"),
        'ഛ' => Consonant("ch"),
        'ജ' => Consonant("j"),
        'ഝ' => Consonant("jh"),
        'ഞ' => Consonant("ñ"),
        'ട' => Consonant("ṭ"),
        'ഠ' => Consonant("ṭh"),
        'ഡ' => Consonant("ḍ"),
        'ഢ' => Consonant("ḍh"),
        'ണ' => Consonant("ṇ"),
        'ത' => Consonant("t"),
        'ഥ' => Consonant("th"),
        'ദ' => Consonant("d"),
        'ധ' => Consonant("dh"),
        'ന' => Consonant("n"),
        'പ' => Consonant("p"),
        'ഫ' => Consonant("ph"),
        'ബ' => Consonant("b"),
        'ഭ' => Consonant("bh"),
        'മ' => Consonant("m"),
        'യ' => Consonant("y"),
        'ര' => Consonant("r"),
        'റ' => Consonant("ṟ"),
        'ല' => Consonant("l"),
        'ള' => Consonant("ḷ"),
        'ഴ' => Consonant("ḻ"),
        'വ' => Consonant("v"),
        'ശ' => Consonant("ś"),
        'ഷ' => Consonant("ṣ"),
        'സ' => Consonant("s"),
        'ഹ' => Consonant("h"),
        'ാ' => Sign("ā"),
        'ി' => Sign("i"),
        'ീ' => Sign("ī"),
        'ു' => Sign("u"),
        'ൂ' => Sign("ū"),
        'ൃ' => Sign("r̥"),
        'െ' => Sign("e"),
        'േ' => Sign("ē"),
        'ൈ' => Sign("ai"),
        'ൊ' => Sign("o"),
        'ോ' => Sign("ō"),
        'ൌ' | 'ൗ' => Sign("au"),
        '്' => Virama,
        'ം' => Final("ṁ"),
        'ഃ' => Final("ḥ"),
        'ൺ' => Final("ṇ"),
        'ൻ' => Final("n"),
        'ർ' => Final("r"),
        'ൽ' => Final("l"),
        'ൾ' => Final("ḷ"),
        'ൿ' => Final("k"),
        '൦'..='൯' => Final(digit(c, '൦')),
        _ => return None,
    };
    Some(glyph)
}

fn tamil(c: char) -> Option<Glyph> {
    use Glyph::*;
    let glyph = match c {
        'அ' => Vowel("a"),
        'ஆ' => Vowel("ā"),
        'இ' => Vowel("i"),
        'ஈ' => Vowel("ī"),
        'உ' => Vowel("u"),
        'ஊ' => Vowel("ū"),
        'எ' => Vowel("e"),
        'ஏ' => Vowel("ē"),
        'ஐ' => Vowel("ai"),
        'ஒ' => Vowel("o"),
        'ஓ' => Vowel("ō"),
        'ஔ' => Vowel("au"),
        'க' => Consonant("k"),
        'ங' => Consonant("ṅ"),
        'ச' => Consonant("c"),
        'ஞ' => Consonant("ñ"),
        'ட' => Consonant("ṭ"),
        'ண' => Consonant("ṇ"),
        'த' => Consonant("t"),
        'ந' => Consonant("n"),
        'ப' => Consonant("p"),
        'ம' => Consonant("m"),
        'ய' => Consonant("y"),
        'ர' => Consonant("r"),
        'ல' => Consonant("l"),
        'வ' => Consonant("v"),
        'ழ' => Consonant("ḻ"),
        'ள' => Consonant("ḷ"),
        'ற' => Consonant("ṟ"),
        'ன' => Consonant("ṉ"),
        'ஜ' => Consonant("j"),
        'ஶ' => Consonant("ś"),
        'ஷ' => Consonant("ṣ"),
        'ஸ' => Consonant("s"),
        'ஹ' => Consonant("h"),
        'ா' => Sign("ā"),
        'ி' => Sign("i"),
        'ீ' => Sign("ī"),
        'ு' => Sign("u"),
        'ூ' => Sign("ū"),
        'ெ' => Sign("e"),
        'ே' => Sign("ē"),
        'ை' => Sign("ai"),
        'ொ' => Sign("o"),
        'ோ' => Sign("ō"),
        'ௌ' | 'ௗ' => Sign("au"),
        '்' => Virama,
        'ஂ' => Final("ṁ"),
        'ஃ' => Final("ḵ"),
        '௦'..='௯' => Final(digit(c, '௦')),
        _ => return None,
    };
    Some(glyph)
}

fn digit(c: char, zero: char) -> &'static str {
    const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
    DIGITS[(c as u32 - zero as u32) as usize]
}

/// Romanise `text` with a script table; characters outside the script pass through
fn romanize(text: &str, table: fn(char) -> Option<Glyph>) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut inherent = false;
    let mut seen_script = false;

    for c in text.chars() {
        let glyph = table(c);
        seen_script |= glyph.is_some();

        match glyph {
            Some(Glyph::Sign(vowel)) => {
                out.push_str(vowel);
                inherent = false;
            }
            Some(Glyph::Virama) => inherent = false,
            other => {
                if inherent {
                    out.push('a');
                }
                inherent = false;
                match other {
                    Some(Glyph::Consonant(s)) => {
                        out.push_str(s);
                        inherent = true;
                    }
                    Some(Glyph::Vowel(s)) | Some(Glyph::Final(s)) => out.push_str(s),
                    _ => out.push(c),
                }
            }
        }
    }
    if inherent {
        out.push('a');
    }

    seen_script.then_some(out)
}

/// Built-in table transliterator for Malayalam and Tamil
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicTransliterator;

#[async_trait]
impl Transliterator for IndicTransliterator {
    async fn transliterate(
        &self,
        text: &str,
        language: Language,
    ) -> Result<String, TransliterationError> {
        let table: fn(char) -> Option<Glyph> = match language {
            Language::Malayalam => malayalam,
            Language::Tamil => tamil,
            other => return Err(TransliterationError::UnsupportedLanguage(other.to_string())),
        };
        romanize(text, table).ok_or_else(|| TransliterationError::NoScript(language.label().into()))
    }

    fn name(&self) -> &str {
        "indic-table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tamil_words() {
        assert_eq!(romanize("அம்மா", tamil).unwrap(), "ammā");
        assert_eq!(romanize("தமிழ்", tamil).unwrap(), "tamiḻ");
        assert_eq!(romanize("வணக்கம்", tamil).unwrap(), "vaṇakkam");
    }

    #[test]
    fn test_malayalam_words() {
        assert_eq!(romanize("മലയാളം", malayalam).unwrap(), "malayāḷaṁ");
        assert_eq!(romanize("അവൻ", malayalam).unwrap(), "avan");
    }

    #[test]
    fn test_mixed_text_keeps_punctuation() {
        assert_eq!(romanize("தமிழ், 12!", tamil).unwrap(), "tamiḻ, 12!");
        assert_eq!(romanize("௧௨", tamil).unwrap(), "12");
    }

    #[test]
    fn test_no_script() {
        assert!(romanize("hello", malayalam).is_none());
    }

    #[tokio::test]
    async fn test_language_support() {
        let t = IndicTransliterator;
        assert!(t.transliterate("x", Language::English).await.is_err());
        assert!(matches!(
            t.transliterate("hello", Language::Tamil).await,
            Err(TransliterationError::NoScript(_))
        ));
    }
}
