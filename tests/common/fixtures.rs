//! Static input corpora used across harnesses.
//!
//! The event samples follow the shape of Datadog-exported platform logs:
//! a prose preamble, flat `key:"value"` fields, `{}`-nested messages, and
//! base64-encoded key material.

/// One flat event with a nested message and a repeated key.
pub const SAMPLE_EVENT: &str =
    r#"Received event id:"123" data:{key:"value" nested:{a:"1" a:"2"}}"#;

/// Two complete event entries back to back, each carrying a base64
/// `public_key` payload ("-----BEGIN PUBLIC KEY-----" encoded).
pub const SAMPLE_MULTI: &str = concat!(
    r#"Received OcRegisterType event id:"3a92e52d-4caa-4e08-8cf4-1afd93b8c001" specversion:"1.0" "#,
    r#"time:{seconds:1768568725 nanos:86833482} "#,
    r#"data:{controllers:{name:"kmcontroller" public_key:"LS0tLS1CRUdJTiBQVUJMSUMgS0VZLS0tLS0=" operation:"create"}} "#,
    r#"Received OcRegisterType event id:"717aaf67-b18b-40d2-8c22-644fcab107aa" specversion:"1.0" "#,
    r#"time:{seconds:1768615571 nanos:40462313} "#,
    r#"data:{controllers:{name:"kmcontroller" public_key:"LS0tLS1CRUdJTiBQVUJMSUMgS0VZLS0tLS0=" operation:"update"}}"#,
);

/// What `SAMPLE_MULTI`'s payload decodes to.
pub const SAMPLE_PUBLIC_KEY: &str = "-----BEGIN PUBLIC KEY-----";

/// An api_key value that decodes to "service-account-key-0001".
pub const ENCODED_API_KEY: &str = "c2VydmljZS1hY2NvdW50LWtleS0wMDAx";
pub const DECODED_API_KEY: &str = "service-account-key-0001";

/// Datadog export columns with the log text in `Content`.
pub const CSV_BASIC: &str = "\
Date,Host,Content\n\
2024-01-01,host1,\"type:\"\"x\"\"\"\n";

/// A CSV mixing clean rows, an empty content cell, and a malformed cell.
pub const CSV_MIXED: &str = "\
Date,Host,Content\n\
2024-01-01,host1,id:1\n\
2024-01-02,host2,\n\
2024-01-03,host3,\"id:3 data:{key:\"\"v\"\"}\"\n\
2024-01-04,host4,\"broken:{never closed\"\n\
2024-01-05,host5,id:5\n";

/// A quoted content cell spanning two physical lines.
pub const CSV_EMBEDDED_NEWLINE: &str = "\
Date,Content\n\
2024-01-01,\"id:7\nname:\"\"svc\"\"\"\n";

/// Build a CSV with `rows` sequential one-field rows, for order and
/// throughput tests.
pub fn sequential_csv(rows: usize) -> String {
    let mut data = String::from("Date,Host,Content\n");
    for i in 0..rows {
        data.push_str(&format!("2024-01-01,host{i},seq:{i}\n"));
    }
    data
}
