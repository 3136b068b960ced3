use bookshelf::sign::{canonical_string, sign};
use reqwest::Method;

fn methods() -> [Method; 4] {
    [Method::GET, Method::POST, Method::PATCH, Method::DELETE]
}

const PATHS: [&str; 4] = ["/myself", "/books", "/books/5", "/books/Dune%20Messiah"];
const BODIES: [&str; 3] = ["", r#"{"isbn":"9780441013593"}"#, r#"{"status":1}"#];
const SECRETS: [&str; 3] = ["xyz", "xyz ", "another-secret"];

#[test]
fn signing_is_deterministic() {
    for method in &methods() {
        for path in PATHS {
            for body in BODIES {
                for secret in SECRETS {
                    assert_eq!(
                        sign(method, path, body, secret),
                        sign(method, path, body, secret)
                    );
                }
            }
        }
    }
}

#[test]
fn every_fixture_gets_a_distinct_signature() {
    let mut seen = std::collections::HashSet::new();
    for method in &methods() {
        for path in PATHS {
            for body in BODIES {
                for secret in SECRETS {
                    assert!(
                        seen.insert(sign(method, path, body, secret)),
                        "collision for {} {} {:?} {:?}",
                        method,
                        path,
                        body,
                        secret
                    );
                }
            }
        }
    }
    assert_eq!(seen.len(), methods().len() * PATHS.len() * BODIES.len() * SECRETS.len());
}

#[test]
fn changing_one_input_changes_signature() {
    let base = sign(&Method::GET, "/books", "", "xyz");

    assert_ne!(base, sign(&Method::DELETE, "/books", "", "xyz"));
    assert_ne!(base, sign(&Method::GET, "/books/1", "", "xyz"));
    assert_ne!(base, sign(&Method::GET, "/books", "{}", "xyz"));
    assert_ne!(base, sign(&Method::GET, "/books", "", "xyZ"));
}

#[test]
fn secret_never_appears_in_canonical_string() {
    let canonical = canonical_string(&Method::GET, "/books", "");
    assert_eq!(canonical, "GET\n/books\n");
    assert!(!sign(&Method::GET, "/books", "", "xyz").contains("xyz"));
}
