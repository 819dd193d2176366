#![allow(non_snake_case)]
use std::collections::BTreeMap;

use jfetch::{marshal, unmarshal, Marshal, Unmarshal, Zero, J};
use test_case::test_case;

#[derive(Marshal, Unmarshal, Debug, Default, PartialEq)]
struct Pet {
    Name: String,
}

#[derive(Marshal, Unmarshal, Debug, Default, PartialEq)]
struct PetLowerCaseTag {
    #[json(name = "name")]
    Name: String,
}

#[derive(Marshal, Unmarshal, Debug, Default, PartialEq)]
struct PetUpperCaseTag {
    #[json(name = "Name")]
    Name: String,
}

#[derive(Marshal, Unmarshal, Debug, Default, PartialEq)]
struct TwoFields {
    Name: String,
    Tag: String,
}

#[derive(Marshal, Unmarshal, Debug, Default, PartialEq)]
struct Owner {
    FirstName: String,
    Age: u32,
    Verified: bool,
    Pets: Vec<Pet>,
    Nickname: Option<String>,
    #[json(name = "Score", omit_empty)]
    score: f64,
    #[json(skip)]
    Password: String,
}

#[derive(Marshal, Unmarshal, Debug, Default, PartialEq)]
struct Envelope {
    Payload: J,
    Meta: BTreeMap<String, String>,
}

#[derive(Marshal, Unmarshal, Debug, Default, PartialEq)]
struct Keyword {
    r#Type: String,
}

#[derive(Marshal, Unmarshal, Debug, Default, PartialEq)]
struct Localized {
    Имя: String,
}

#[derive(Marshal, Unmarshal, Debug, Default, PartialEq)]
struct Page<T> {
    Items: Vec<T>,
    Total: u64,
}

#[derive(Marshal, Unmarshal, Debug, Default, PartialEq)]
struct Nothing;

#[test]
fn test_marshal_struct() {
    assert_eq!(
        marshal(&Pet {
            Name: "1".to_string()
        })
        .expect("Valid"),
        r#"{"name":"1"}"#
    );
    assert_eq!(
        marshal(&PetLowerCaseTag {
            Name: "2".to_string()
        })
        .expect("Valid"),
        r#"{"name":"2"}"#
    );
    assert_eq!(
        marshal(&PetUpperCaseTag {
            Name: "3".to_string()
        })
        .expect("Valid"),
        r#"{"Name":"3"}"#
    );
}

#[test]
fn test_unmarshal_struct() {
    assert_eq!(
        unmarshal::<Pet>(r#"{"name":"1"}"#).expect("Valid"),
        Pet {
            Name: "1".to_string()
        }
    );
    assert_eq!(
        unmarshal::<PetLowerCaseTag>(r#"{"name":"2"}"#).expect("Valid"),
        PetLowerCaseTag {
            Name: "2".to_string()
        }
    );
    assert_eq!(
        unmarshal::<PetUpperCaseTag>(r#"{"Name":"3"}"#).expect("Valid"),
        PetUpperCaseTag {
            Name: "3".to_string()
        }
    );
}

#[test]
fn test_omit_empty_by_default() {
    let value = TwoFields {
        Name: "hello".to_string(),
        Tag: String::new(),
    };
    let json = marshal(&value).expect("Valid");
    assert_eq!(json, r#"{"name":"hello"}"#);
    assert_eq!(unmarshal::<TwoFields>(&json).expect("Valid"), value);
}

#[test]
fn test_dont_omit_empty_if_named() {
    assert_eq!(
        marshal(&PetUpperCaseTag::default()).expect("Valid"),
        r#"{"Name":""}"#
    );
}

#[test]
fn test_all_zero_fields() {
    assert_eq!(marshal(&TwoFields::default()).expect("Valid"), "{}");
    assert_eq!(marshal(&Owner::default()).expect("Valid"), "{}");
    assert!(Owner::default().is_zero());
}

#[test]
fn test_declaration_order() {
    let owner = Owner {
        FirstName: "Ann".to_string(),
        Age: 30,
        Verified: true,
        Pets: vec![Pet {
            Name: "Lola".to_string(),
        }],
        Nickname: Some(String::new()),
        score: 1.5,
        Password: "secret".to_string(),
    };
    assert_eq!(
        marshal(&owner).expect("Valid"),
        r#"{"firstName":"Ann","age":30,"verified":true,"pets":[{"name":"Lola"}],"nickname":"","Score":1.5}"#
    );
}

#[test]
fn test_skip() {
    let owner: Owner =
        unmarshal(r#"{"firstName":"Ann","password":"leaked","Password":"leaked"}"#).expect("Valid");
    assert_eq!(owner.FirstName, "Ann");
    assert_eq!(owner.Password, "");
}

#[test_case(r#"{"firstName":"Ann"}"#; "exact")]
#[test_case(r#"{"FirstName":"Ann"}"#; "declared case")]
#[test_case(r#"{"FIRSTNAME":"Ann"}"#; "upper case")]
#[test_case(r#"{"firstname":"Ann","unknown":[1,{"a":2}]}"#; "unknown keys ignored")]
#[test_case(r#"{"firstName":"Bob","firstName":"Ann"}"#; "last duplicate wins")]
fn test_unmarshal_case_insensitive(input: &str) {
    let owner: Owner = unmarshal(input).expect("Valid");
    assert_eq!(owner.FirstName, "Ann");
}

#[test]
fn test_unmarshal_missing_fields_default() {
    let owner: Owner = unmarshal(r#"{"age":3}"#).expect("Valid");
    assert_eq!(
        owner,
        Owner {
            Age: 3,
            ..Owner::default()
        }
    );
}

#[test_case("[1,2]"; "array")]
#[test_case(r#""owner""#; "string")]
#[test_case(r#"{"age":"old"}"#; "field type mismatch")]
#[test_case(r#"{"age":3"#; "truncated")]
fn test_unmarshal_mismatch(input: &str) {
    assert!(matches!(
        unmarshal::<Owner>(input),
        Err(jfetch::Error::Decode(_))
    ));
}

#[test]
fn test_dynamic_field() {
    let envelope: Envelope =
        unmarshal(r#"{"payload":{"pets":[{"name":"Lola"}]},"meta":{"v":"1"}}"#).expect("Valid");
    assert_eq!(envelope.Payload.q(".pets[0].name").as_str(), Some("Lola"));
    assert_eq!(
        marshal(&envelope).expect("Valid"),
        r#"{"payload":{"pets":[{"name":"Lola"}]},"meta":{"v":"1"}}"#
    );

    let empty: Envelope = unmarshal(r#"{"payload":null}"#).expect("Valid");
    assert!(empty.Payload.is_nil());
    assert_eq!(marshal(&empty).expect("Valid"), "{}");
}

#[test]
fn test_raw_identifier() {
    let value = Keyword {
        r#Type: "dog".to_string(),
    };
    assert_eq!(marshal(&value).expect("Valid"), r#"{"type":"dog"}"#);
    assert_eq!(unmarshal::<Keyword>(r#"{"type":"dog"}"#).expect("Valid"), value);
}

#[test]
fn test_unicode_name() {
    let value = Localized {
        Имя: "Лола".to_string(),
    };
    assert_eq!(marshal(&value).expect("Valid"), r#"{"имя":"Лола"}"#);
    assert_eq!(unmarshal::<Localized>(r#"{"ИМЯ":"Лола"}"#).expect("Valid"), value);
}

#[test]
fn test_generic_struct() {
    let page = Page {
        Items: vec![Pet {
            Name: "Lola".to_string(),
        }],
        Total: 0,
    };
    let json = marshal(&page).expect("Valid");
    assert_eq!(json, r#"{"items":[{"name":"Lola"}]}"#);
    assert_eq!(unmarshal::<Page<Pet>>(&json).expect("Valid"), page);
}

#[test]
fn test_unit_struct() {
    assert_eq!(marshal(&Nothing).expect("Valid"), "{}");
    assert_eq!(
        unmarshal::<Nothing>(r#"{"anything":1}"#).expect("Valid"),
        Nothing
    );
}

#[test]
fn test_nested_zero_struct_is_omitted() {
    #[derive(Marshal, Default)]
    struct Outer {
        Inner: TwoFields,
        #[json(name = "Kept")]
        kept: TwoFields,
    }
    assert_eq!(
        marshal(&Outer::default()).expect("Valid"),
        r#"{"Kept":{}}"#
    );
}

#[derive(Marshal, Unmarshal, Debug, Default, PartialEq)]
struct Household {
    Owner: Owner,
    Address: String,
}

#[test]
fn test_unmarshal_null_document() {
    assert_eq!(unmarshal::<Owner>("null").expect("Valid"), Owner::default());
    assert_eq!(unmarshal::<Nothing>("null").expect("Valid"), Nothing);
}

#[test]
fn test_unmarshal_null_nested_struct() {
    let household: Household =
        unmarshal(r#"{"owner":null,"address":"Baker Street"}"#).expect("Valid");
    assert_eq!(household.Owner, Owner::default());
    assert_eq!(household.Address, "Baker Street");
}
