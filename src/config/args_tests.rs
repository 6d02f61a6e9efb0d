//! Tests for datasource, header and plugin flag parsing.

use std::path::{Path, PathBuf};

use super::ConfigError;
use super::args::{
    HeaderArg, parse_datasource_arg, parse_datasource_args, parse_header_arg, parse_header_args,
    parse_plugin_args,
};
use super::document::{Config, Headers};

fn cwd() -> PathBuf {
    PathBuf::from("/work/project")
}

fn no_args() -> &'static [&'static str] {
    &[]
}

mod datasource_args {
    use super::*;

    #[test]
    fn bare_file_uses_stem_as_alias() {
        let (alias, ds) = parse_datasource_arg("data.json", &cwd()).unwrap();

        assert_eq!(alias, "data");
        assert_eq!(
            ds.url.unwrap().as_str(),
            "file:///work/project/data.json"
        );
        assert!(ds.header.is_empty());
    }

    #[test]
    fn bare_file_alias_stops_at_first_dot() {
        let (alias, _) = parse_datasource_arg("config.prod.yaml", &cwd()).unwrap();
        assert_eq!(alias, "config");
    }

    #[test]
    fn bare_file_without_extension() {
        let (alias, ds) = parse_datasource_arg("values", &cwd()).unwrap();
        assert_eq!(alias, "values");
        assert_eq!(ds.url.unwrap().path(), "/work/project/values");
    }

    #[test]
    fn bare_path_with_directory_requires_alias() {
        let result = parse_datasource_arg("bar/data.json", &cwd());

        match result {
            Err(ConfigError::MissingAlias { value }) => assert_eq!(value, "bar/data.json"),
            other => panic!("expected MissingAlias, got {other:?}"),
        }
    }

    #[test]
    fn bare_absolute_path_requires_alias() {
        assert!(matches!(
            parse_datasource_arg("/etc/data.json", &cwd()),
            Err(ConfigError::MissingAlias { .. })
        ));
    }

    #[test]
    fn aliased_relative_path() {
        let (alias, ds) = parse_datasource_arg("foo=bar/data.json", &cwd()).unwrap();

        assert_eq!(alias, "foo");
        assert_eq!(
            ds.url.unwrap().as_str(),
            "file:///work/project/bar/data.json"
        );
    }

    #[test]
    fn aliased_remote_url() {
        let (alias, ds) =
            parse_datasource_arg("api=https://example.com/v1/items?limit=5", &cwd()).unwrap();

        assert_eq!(alias, "api");
        assert_eq!(
            ds.url.unwrap().as_str(),
            "https://example.com/v1/items?limit=5"
        );
    }

    #[test]
    fn aliased_stdin() {
        let (alias, ds) = parse_datasource_arg("input=-", &cwd()).unwrap();
        assert_eq!(alias, "input");
        assert_eq!(ds.url.unwrap().scheme(), "stdin");
    }

    #[test]
    fn splits_on_first_equals_only() {
        let (alias, ds) =
            parse_datasource_arg("q=https://example.com/search?q=a=b", &cwd()).unwrap();
        assert_eq!(alias, "q");
        assert_eq!(ds.url.unwrap().query(), Some("q=a=b"));
    }

    #[test]
    fn list_builds_alias_map() {
        let sources =
            parse_datasource_args(&["data.json", "remote=https://example.com/x"], &cwd()).unwrap();

        assert_eq!(sources.len(), 2);
        assert!(sources.contains_key("data"));
        assert!(sources.contains_key("remote"));
    }

    #[test]
    fn list_aborts_on_first_error() {
        let result = parse_datasource_args(&["ok=ok.json", "nested/bad.json"], &cwd());
        assert!(matches!(result, Err(ConfigError::MissingAlias { .. })));
    }
}

mod header_args {
    use super::*;

    #[test]
    fn parses_alias_name_and_value() {
        let arg = parse_header_arg("foo=X-Api-Key: abc123").unwrap();

        assert_eq!(
            arg,
            HeaderArg {
                alias: "foo".to_string(),
                name: "X-Api-Key".to_string(),
                value: "abc123".to_string(),
            }
        );
    }

    #[test]
    fn canonicalizes_name_and_trims_value() {
        let arg = parse_header_arg("foo=authorization:   Bearer token  ").unwrap();

        assert_eq!(arg.name, "Authorization");
        assert_eq!(arg.value, "Bearer token");
    }

    #[test]
    fn value_may_contain_colons() {
        let arg = parse_header_arg("foo=Referer: https://example.com:8080/").unwrap();
        assert_eq!(arg.value, "https://example.com:8080/");
    }

    #[test]
    fn missing_equals_is_error() {
        match parse_header_arg("X-Api-Key: abc") {
            Err(ConfigError::InvalidHeaderArg { value }) => assert_eq!(value, "X-Api-Key: abc"),
            other => panic!("expected InvalidHeaderArg, got {other:?}"),
        }
    }

    #[test]
    fn missing_colon_is_error() {
        match parse_header_arg("foo=X-Api-Key abc") {
            Err(ConfigError::InvalidHeader { value }) => assert_eq!(value, "X-Api-Key abc"),
            other => panic!("expected InvalidHeader, got {other:?}"),
        }
    }

    #[test]
    fn invalid_name_is_error() {
        assert!(matches!(
            parse_header_arg("foo=Bad Name: x"),
            Err(ConfigError::InvalidHeaderName { .. })
        ));
    }

    #[test]
    fn repeated_headers_append_in_order() {
        let headers = parse_header_args(&[
            "foo=Accept: text/plain",
            "foo=accept: application/json",
            "bar=X-Token: t",
        ])
        .unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(
            headers["foo"]["Accept"],
            vec!["text/plain", "application/json"]
        );
        assert_eq!(headers["bar"]["X-Token"], vec!["t"]);
    }
}

mod plugin_args {
    use super::*;

    #[test]
    fn parses_name_and_path() {
        let plugins = parse_plugin_args(&["hello=/usr/local/bin/hello", "echo=echo"]).unwrap();

        assert_eq!(plugins["hello"], "/usr/local/bin/hello");
        assert_eq!(plugins["echo"], "echo");
    }

    #[test]
    fn later_flag_wins() {
        let plugins = parse_plugin_args(&["p=/a", "p=/b"]).unwrap();
        assert_eq!(plugins["p"], "/b");
    }

    #[test]
    fn missing_equals_is_error() {
        match parse_plugin_args(&["hello"]) {
            Err(ConfigError::InvalidPlugin { value }) => assert_eq!(value, "hello"),
            other => panic!("expected InvalidPlugin, got {other:?}"),
        }
    }

    #[test]
    fn config_plugin_flags() {
        let mut config = Config::default();
        config.parse_plugin_flags(&["a=/bin/a"]).unwrap();
        assert_eq!(config.plugins["a"], "/bin/a");
    }
}

mod datasource_flags {
    use super::*;

    fn parse(
        datasources: &[&str],
        contexts: &[&str],
        headers: &[&str],
        cwd: &Path,
    ) -> Result<Config, ConfigError> {
        let mut config = Config::default();
        config.parse_datasource_flags(datasources, contexts, headers, cwd)?;
        Ok(config)
    }

    #[test]
    fn header_attaches_to_matching_datasource() {
        let config = parse(&["foo=data.json"], no_args(), &["foo=X-Api-Key: abc123"], &cwd())
            .unwrap();

        let mut expected = Headers::new();
        expected.insert("X-Api-Key".to_string(), vec!["abc123".to_string()]);
        assert_eq!(config.datasources["foo"].header, expected);
        assert!(config.extra_headers.is_empty());
    }

    #[test]
    fn header_attaches_to_matching_context() {
        let config = parse(
            no_args(),
            &["cfg=https://example.com/cfg.json"],
            &["cfg=Authorization: Bearer x"],
            &cwd(),
        )
        .unwrap();

        assert_eq!(
            config.context["cfg"].header["Authorization"],
            vec!["Bearer x"]
        );
        assert!(config.datasources.is_empty());
        assert!(config.extra_headers.is_empty());
    }

    #[test]
    fn header_attaches_to_both_when_alias_is_shared() {
        let config = parse(&["x=a.json"], &["x=b.json"], &["x=Accept: */*"], &cwd()).unwrap();

        assert_eq!(config.datasources["x"].header["Accept"], vec!["*/*"]);
        assert_eq!(config.context["x"].header["Accept"], vec!["*/*"]);
    }

    #[test]
    fn unmatched_header_becomes_extra() {
        let config = parse(
            &["foo=data.json"],
            no_args(),
            &["other=X-Token: t1", "other=X-Token: t2"],
            &cwd(),
        )
        .unwrap();

        assert!(config.datasources["foo"].header.is_empty());
        assert_eq!(config.extra_headers["other"]["X-Token"], vec!["t1", "t2"]);
    }

    #[test]
    fn context_error_aborts() {
        let result = parse(&["ok.json"], &["sub/ctx.json"], no_args(), &cwd());
        assert!(matches!(result, Err(ConfigError::MissingAlias { .. })));
    }

    #[test]
    fn header_error_aborts() {
        let result = parse(&["ok.json"], no_args(), &["broken"], &cwd());
        assert!(matches!(result, Err(ConfigError::InvalidHeaderArg { .. })));
    }
}
