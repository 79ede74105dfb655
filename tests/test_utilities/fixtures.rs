/// Scanner output fixtures shared by the integration tests
use chrono::{NaiveDate, NaiveDateTime};

pub const MAIN_MODULE: &str = "example.com/app";

/// `govulncheck -json` stream for a module on go1.22.1 requiring `modules`,
/// with one public advisory for golang.org/x/net fixed in v0.17.0.
pub fn json_stream(modules: &[(&str, &str)]) -> String {
    let mut entries = vec![format!("      {{\n        \"path\": \"{}\"\n      }}", MAIN_MODULE)];
    for (path, version) in modules {
        entries.push(format!(
            "      {{\n        \"path\": \"{}\",\n        \"version\": \"{}\"\n      }}",
            path, version
        ));
    }

    format!(
        r#"{{
  "config": {{
    "protocol_version": "v1.0.0",
    "scanner_name": "govulncheck",
    "scanner_version": "v1.1.3",
    "db": "https://vuln.go.dev",
    "db_last_modified": "2025-02-27T18:05:11Z",
    "go_version": "go1.22.1",
    "scan_level": "symbol"
  }}
}}
{{
  "progress": {{
    "message": "Scanning your code and 87 packages across 6 dependent modules for known vulnerabilities..."
  }}
}}
{{
  "SBOM": {{
    "go_version": "go1.22.1",
    "modules": [
{}
    ],
    "roots": [
      "{}"
    ]
  }}
}}
{{
  "osv": {{
    "schema_version": "1.3.1",
    "id": "GO-2023-2102",
    "modified": "2024-05-20T16:03:47Z",
    "aliases": ["CVE-2023-39325", "GHSA-4374-p667-p6c8"],
    "summary": "HTTP/2 rapid reset can cause excessive work in net/http",
    "details": "A malicious HTTP/2 client which rapidly creates requests and immediately resets them can cause excessive server resource consumption.",
    "affected": [
      {{
        "package": {{
          "name": "golang.org/x/net",
          "ecosystem": "Go"
        }},
        "ranges": [
          {{
            "type": "SEMVER",
            "events": [
              {{"introduced": "0"}},
              {{"fixed": "0.17.0"}}
            ]
          }}
        ]
      }}
    ]
  }}
}}
{{
  "finding": {{
    "osv": "GO-2023-2102",
    "fixed_version": "v0.17.0",
    "trace": [
      {{
        "module": "golang.org/x/net",
        "version": "v0.15.0"
      }}
    ]
  }}
}}
"#,
        entries.join(",\n"),
        MAIN_MODULE
    )
}

/// Text report of an internal module vulnerable below its own v1.2.0.
pub const ACME_FOO_REPORT: &str = "Scanning your code and 12 packages across 2 dependent modules for known vulnerabilities...

=== Symbol Results ===

Vulnerability #1: GO-2024-0001
    Injection in acme request parser
  More info: https://pkg.go.dev/vuln/GO-2024-0001
  Module: github.com/acme/foo
    Found in: github.com/acme/foo@v1.0.0
    Fixed in: github.com/acme/foo@v1.2.0
    Example traces found:
      #1: parse.go:12:2: foo.Parse calls foo.decode

Your code is affected by 1 vulnerability from 1 module.
";

/// Text report naming a standard library package.
pub const STDLIB_REPORT: &str = "=== Symbol Results ===

Vulnerability #1: GO-2024-2687
    HTTP/2 CONTINUATION flood in net/http
  More info: https://pkg.go.dev/vuln/GO-2024-2687
  Standard library
    Found in: net/http@go1.22.1
    Fixed in: net/http@go1.22.2
    Example traces found:
      #1: server.go:40:3: bar.Serve calls http.Server.ListenAndServe

Your code is affected by 1 vulnerability from the Go standard library.
";

pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}
