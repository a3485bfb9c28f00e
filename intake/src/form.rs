use common::models::NewCustomer;
use url::form_urlencoded;

/// Decodes an `application/x-www-form-urlencoded` body.
///
/// Interest tags arrive as repeated `interests[]` (or `interests`) keys and keep
/// their order. For single-valued fields the first occurrence wins, even when
/// empty; absent fields stay empty and are caught by validation.
pub fn parse_submission(body: &[u8]) -> NewCustomer {
    let mut full_name = None;
    let mut email = None;
    let mut country = None;
    let mut message = None;
    let mut interests = Vec::new();

    for (key, value) in form_urlencoded::parse(body) {
        let slot = match &*key {
            "full_name" => &mut full_name,
            "email" => &mut email,
            "country" => &mut country,
            "message" => &mut message,
            "interests[]" | "interests" => {
                interests.push(value.into_owned());
                continue;
            }
            _ => continue,
        };
        slot.get_or_insert_with(|| value.into_owned());
    }

    NewCustomer {
        full_name: full_name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        country: country.unwrap_or_default(),
        interests,
        message: message.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_all_fields() {
        let body = b"full_name=Jane+Doe&email=jane%40x.com&country=US\
            &interests%5B%5D=history&interests%5B%5D=food&message=hi%20there";
        let customer = parse_submission(body);

        assert_eq!(customer.full_name, "Jane Doe");
        assert_eq!(customer.email, "jane@x.com");
        assert_eq!(customer.country, "US");
        assert_eq!(customer.interests, vec!["history", "food"]);
        assert_eq!(customer.message, "hi there");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let customer = parse_submission(b"email=a%40b.c&unknown=1");
        assert_eq!(customer.full_name, "");
        assert_eq!(customer.email, "a@b.c");
        assert!(customer.interests.is_empty());
        assert_eq!(customer.missing_fields(), vec!["full_name", "country"]);
    }

    #[test]
    fn test_plain_interests_key_and_unicode() {
        let customer = parse_submission("full_name=张伟&interests=美食&interests=历史".as_bytes());
        assert_eq!(customer.full_name, "张伟");
        assert_eq!(customer.interests, vec!["美食", "历史"]);
    }

    #[test]
    fn test_first_value_wins_for_single_fields() {
        let customer = parse_submission(b"country=US&country=FR");
        assert_eq!(customer.country, "US");
    }

    #[test]
    fn test_empty_first_value_is_kept() {
        let customer = parse_submission(b"full_name=&full_name=Jane&email=a%40b.c&country=US");
        assert_eq!(customer.full_name, "");
        assert_eq!(customer.missing_fields(), vec!["full_name"]);
    }
}
