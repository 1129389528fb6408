fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use chrono::{DateTime, Utc};
    use mesh_auth::{Credentials, mint_at};
    use mesh_protocol::{ChunkRange, InboxResponse, SendMessageResponse};
    use serde::Deserialize;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values.
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed).unwrap();
        assert_eq!(fixture, reserialized, "roundtrip mismatch for {name}");
        parsed
    }

    #[test]
    fn send_message_response() {
        let resp: SendMessageResponse = roundtrip_test("send_message_response.json");
        assert_eq!(resp.message_id, "20240131162809267016_1B6541");
    }

    #[test]
    fn inbox_response() {
        let resp: InboxResponse = roundtrip_test("inbox_response.json");
        assert_eq!(resp.messages.len(), 2);
        assert_eq!(resp.approx_inbox_count, 2);
    }

    #[test]
    fn inbox_response_empty() {
        let resp: InboxResponse = roundtrip_test("inbox_response_empty.json");
        assert!(resp.messages.is_empty());
    }

    #[test]
    fn inbox_response_tolerates_missing_and_extra_fields() {
        let resp: InboxResponse =
            serde_json::from_str(r#"{"messages":["A"],"links":{"self":"/x"}}"#).unwrap();
        assert_eq!(resp.messages, ["A"]);
        assert_eq!(resp.approx_inbox_count, 0);
    }

    #[derive(Deserialize)]
    struct TokenVector {
        mailbox_id: String,
        mailbox_password: String,
        shared_key: String,
        nonce: String,
        nonce_count: u32,
        time: DateTime<Utc>,
        timestamp: String,
        digest: String,
    }

    #[test]
    fn token_vectors() {
        let vectors: Vec<TokenVector> =
            serde_json::from_value(load_fixture("token_vectors.json")).unwrap();
        assert!(!vectors.is_empty());

        for v in vectors {
            let creds = Credentials::new(
                v.mailbox_id.as_str(),
                v.mailbox_password.as_str(),
                v.shared_key.as_str(),
            )
            .unwrap();
            let token = mint_at(&creds, Some(&v.nonce), v.nonce_count, v.time).unwrap();

            assert_eq!(token.timestamp, v.timestamp, "{}", v.mailbox_id);
            assert_eq!(token.digest, v.digest, "{}", v.mailbox_id);
            assert_eq!(
                token.to_string(),
                format!(
                    "NHSMESH {}:{}:{}:{}:{}",
                    v.mailbox_id, v.nonce, v.nonce_count, v.timestamp, v.digest
                )
            );
        }
    }

    #[test]
    fn chunk_range_header_values() {
        for (raw, index, total) in [("1:1", 1, 1), ("2:3", 2, 3), ("10:10", 10, 10)] {
            let range: ChunkRange = raw.parse().unwrap();
            assert_eq!((range.index, range.total), (index, total));
            assert_eq!(range.to_string(), raw);
        }
        for raw in ["", "1", "0:1", "2:1", "a:b", "1:2:3"] {
            assert!(raw.parse::<ChunkRange>().is_err(), "{raw:?}");
        }
    }
}
