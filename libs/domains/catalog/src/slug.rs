//! URL slugs derived from display names

use crud::CrudError;

/// Lower-case ASCII letters, digits and single hyphens.
///
/// Common Latin accents are folded (`"Crème Brûlée"` becomes
/// `"creme-brulee"`); anything else that is not a letter, digit, space or
/// hyphen is dropped.
pub fn slugify(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        match fold_accent(c) {
            Some(ascii) => folded.push_str(ascii),
            None => folded.push(c),
        }
    }

    let mut slug = String::with_capacity(folded.len());
    let mut pending_hyphen = false;

    for c in folded.chars().flat_map(char::to_lowercase) {
        match c {
            'a'..='z' | '0'..='9' => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c);
            }
            '-' => pending_hyphen = true,
            c if c.is_whitespace() => pending_hyphen = true,
            _ => {}
        }
    }

    slug
}

/// Slug for a stored entity; a name with nothing sluggable is rejected.
pub fn slug_for(name: &str) -> Result<String, CrudError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(CrudError::Invalid(
            "name must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(slug)
}

fn fold_accent(c: char) -> Option<&'static str> {
    let ascii = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' | 'ạ' | 'ả' | 'ấ' | 'ầ' | 'ẩ' | 'ẫ'
        | 'ậ' | 'ắ' | 'ằ' | 'ẳ' | 'ẵ' | 'ặ' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' | 'Ạ' | 'Ả' | 'Ấ' | 'Ầ' | 'Ẩ' | 'Ẫ'
        | 'Ậ' | 'Ắ' | 'Ằ' | 'Ẳ' | 'Ẵ' | 'Ặ' => "A",
        'æ' => "ae",
        'Æ' => "AE",
        'ç' | 'ć' | 'č' => "c",
        'Ç' | 'Ć' | 'Č' => "C",
        'đ' | 'ď' => "d",
        'Đ' | 'Ď' => "D",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' | 'ẹ' | 'ẻ' | 'ẽ' | 'ế' | 'ề' | 'ể' | 'ễ' | 'ệ' => {
            "e"
        }
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ę' | 'Ě' | 'Ẹ' | 'Ẻ' | 'Ẽ' | 'Ế' | 'Ề' | 'Ể' | 'Ễ' | 'Ệ' => {
            "E"
        }
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ĩ' | 'ị' | 'ỉ' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'Ĩ' | 'Ị' | 'Ỉ' => "I",
        'ł' => "l",
        'Ł' => "L",
        'ñ' | 'ń' | 'ň' => "n",
        'Ñ' | 'Ń' | 'Ň' => "N",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' | 'ơ' | 'ọ' | 'ỏ' | 'ố' | 'ồ' | 'ổ' | 'ỗ'
        | 'ộ' | 'ớ' | 'ờ' | 'ở' | 'ỡ' | 'ợ' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ő' | 'Ơ' | 'Ọ' | 'Ỏ' | 'Ố' | 'Ồ' | 'Ổ' | 'Ỗ'
        | 'Ộ' | 'Ớ' | 'Ờ' | 'Ở' | 'Ỡ' | 'Ợ' => "O",
        'œ' => "oe",
        'Œ' => "OE",
        'ř' => "r",
        'Ř' => "R",
        'ś' | 'š' | 'ş' => "s",
        'Ś' | 'Š' | 'Ş' => "S",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'Ť' | 'Ţ' => "T",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ũ' | 'ư' | 'ụ' | 'ủ' | 'ứ' | 'ừ' | 'ử' | 'ữ'
        | 'ự' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' | 'Ű' | 'Ũ' | 'Ư' | 'Ụ' | 'Ủ' | 'Ứ' | 'Ừ' | 'Ử' | 'Ữ'
        | 'Ự' => "U",
        'ý' | 'ÿ' | 'ỳ' | 'ỵ' | 'ỷ' | 'ỹ' => "y",
        'Ý' | 'Ÿ' | 'Ỳ' | 'Ỵ' | 'Ỷ' | 'Ỹ' => "Y",
        'ź' | 'ż' | 'ž' => "z",
        'Ź' | 'Ż' | 'Ž' => "Z",
        _ => return None,
    };
    Some(ascii)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(slugify("Adidas"), "adidas");
        assert_eq!(slugify("Running Shoes 2024"), "running-shoes-2024");
    }

    #[test]
    fn test_accents_are_folded() {
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
        assert_eq!(slugify("Đồng hồ Thông minh"), "dong-ho-thong-minh");
        assert_eq!(slugify("Straße"), "strasse");
    }

    #[test]
    fn test_separators_collapse_and_trim() {
        assert_eq!(slugify("  Hello   --  World  "), "hello-world");
        assert_eq!(slugify("-leading and trailing-"), "leading-and-trailing");
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("snake_case"), "snakecase");
    }

    #[test]
    fn test_symbols_are_dropped() {
        assert_eq!(slugify("Rock & Roll!"), "rock-roll");
        assert_eq!(slugify("C++ / Rust"), "c-rust");
        assert_eq!(slugify("日本"), "");
    }

    #[test]
    fn test_slug_for_rejects_empty() {
        assert_eq!(slug_for("Nike Air").unwrap(), "nike-air");
        assert!(matches!(slug_for("!!!"), Err(CrudError::Invalid(_))));
        assert!(slug_for("   ").is_err());
    }
}
