//! People 处理器

use axum::{extract::Path, http::HeaderMap};

use super::model::Person;
use crate::core::{
    error::CoreError,
    format::{negotiate, ResponseFormat},
    response::Xml,
};

/// `GET /people/:id`，id 不参与查找
pub async fn show_person(
    Path(segment): Path<String>,
    headers: HeaderMap,
) -> Result<Xml<Person>, CoreError> {
    negotiate(&segment, &headers, ResponseFormat::Xml)?;
    Ok(Xml(Person::featured()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::{events::Event, Reader};

    #[test]
    fn renders_well_formed_xml() {
        let body = Xml(Person::featured()).render().unwrap();
        assert!(body.starts_with("<?xml"));
        assert!(body.contains("<name>David Heinemeier Hansson</name>"));

        let mut reader = Reader::from_str(&body);
        let mut depth = 0i32;
        loop {
            match reader.read_event() {
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::End(_)) => depth -= 1,
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("malformed xml: {e}"),
            }
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn xml_reads_back_into_person() {
        let body = Xml(Person::featured()).render().unwrap();
        let person: Person = quick_xml::de::from_str(&body).unwrap();
        assert_eq!(person, Person::featured());
        assert!(person.bio.starts_with("A product of Danish Design"));
    }
}
