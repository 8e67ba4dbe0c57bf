#[cfg(test)]
#[allow(clippy::expect_used)] // Tests panic on failure by design.
mod tests {
    use axum_pathpattern::{Keys, Mode, Parsed, inject, parse};
    use regex::{Regex, RegexBuilder};
    use serde_json::json;

    // ==============================================================================
    // Test Helpers
    // ==============================================================================

    fn compile(template: &str) -> Parsed {
        parse(template, Mode::Strict).expect("valid template")
    }

    fn keys(names: &[&str]) -> Keys {
        Keys::Named(names.iter().map(|&name| name.to_owned()).collect())
    }

    /// Matches `url` and returns the present parameters, or `None` on no match.
    fn exec(template: &str, url: &str, mode: Mode) -> Option<Vec<(String, String)>> {
        let parsed = parse(template, mode).expect("valid template");
        let params = parsed.exec(url)?;
        Some(
            params
                .iter()
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .collect(),
        )
    }

    fn strict(template: &str, url: &str) -> Option<Vec<(String, String)>> {
        exec(template, url, Mode::Strict)
    }

    fn loose(template: &str, url: &str) -> Option<Vec<(String, String)>> {
        exec(template, url, Mode::Loose)
    }

    fn found(pairs: &[(&str, &str)]) -> Option<Vec<(String, String)>> {
        Some(
            pairs
                .iter()
                .map(|&(key, value)| (key.to_owned(), value.to_owned()))
                .collect(),
        )
    }

    /// Matched text and every visible group, like a raw regex exec.
    fn raw(template: &str, url: &str, mode: Mode) -> Option<(String, Vec<Option<String>>)> {
        let parsed = parse(template, mode).expect("valid template");
        let caps = parsed.pattern.exec(url)?;
        let groups = caps.iter().map(|group| group.map(str::to_owned)).collect();
        Some((caps.as_str().to_owned(), groups))
    }

    fn groups(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|value| value.map(str::to_owned)).collect()
    }

    // ==============================================================================
    // Normalization
    // ==============================================================================

    #[test]
    fn lead_slash_is_optional() {
        assert_eq!(compile("/"), compile(""));
        assert_eq!(compile("/books"), compile("books"));
        assert_eq!(compile("/books/:title"), compile("books/:title"));
        assert_eq!(compile("/books/:title?"), compile("books/:title?"));
        assert_eq!(compile("/books/*"), compile("books/*"));
    }

    #[test]
    fn root_matches_slash() {
        let parsed = compile("/");
        assert_eq!(parsed.keys, keys(&[]));
        assert!(parsed.pattern.is_match("/"));
        assert!(!parsed.pattern.is_match("/books"));
    }

    // ==============================================================================
    // Static
    // ==============================================================================

    #[test]
    fn static_route() {
        let Parsed { keys: names, pattern } = compile("/books");
        assert_eq!(names, keys(&[]));
        assert!(pattern.is_match("/books"));
        assert!(pattern.is_match("/books/"));
        assert!(!pattern.is_match("/books/author"));
        assert!(!pattern.is_match("books"));
    }

    #[test]
    fn static_multiple_segments() {
        let Parsed { keys: names, pattern } = compile("/foo/bar");
        assert_eq!(names, keys(&[]));
        assert!(pattern.is_match("/foo/bar"));
        assert!(pattern.is_match("/foo/bar/"));
        assert!(!pattern.is_match("/foo/bar/baz"));
        assert!(!pattern.is_match("foo/bar"));
    }

    #[test]
    fn matching_ignores_case() {
        let parsed = compile("/books/:title");
        let caps = parsed.pattern.exec("/BOOKS/Narnia").expect("matches");
        assert_eq!(caps.get(1), Some("Narnia"));
    }

    // ==============================================================================
    // Parameters
    // ==============================================================================

    #[test]
    fn param() {
        let Parsed { keys: names, pattern } = compile("/books/:title");
        assert_eq!(names, keys(&["title"]));
        assert!(!pattern.is_match("/books"));
        assert!(!pattern.is_match("/books/"));
        assert!(pattern.is_match("/books/narnia"));
        assert!(pattern.is_match("/books/narnia/"));
        assert!(!pattern.is_match("/books/narnia/hello"));
        assert!(!pattern.is_match("books/narnia"));

        let caps = pattern.exec("/books/narnia").expect("matches");
        assert_eq!(caps.as_str(), "/books/narnia");
        assert_eq!(caps.get(1), Some("narnia"));
    }

    #[test]
    fn param_without_static() {
        let Parsed { keys: names, pattern } = compile("/:title");
        assert_eq!(names, keys(&["title"]));
        assert!(!pattern.is_match("/"));
        assert!(pattern.is_match("/narnia"));
        assert!(pattern.is_match("/narnia/"));
        assert!(!pattern.is_match("/narnia/reviews"));
        assert!(!pattern.is_match("narnia"));

        let caps = pattern.exec("/narnia/").expect("matches");
        assert_eq!(caps.as_str(), "/narnia/");
        assert_eq!(caps.get(1), Some("narnia"));
    }

    #[test]
    fn param_after_statics() {
        let pattern = compile("/foo/bar/:title").pattern;
        assert!(!pattern.is_match("/foo/bar"));
        assert!(!pattern.is_match("/foo/bar/"));
        assert!(pattern.is_match("/foo/bar/narnia"));
        assert!(pattern.is_match("/foo/bar/narnia/"));
        assert!(!pattern.is_match("/foo/bar/narnia/hello"));
        assert!(!pattern.is_match("/foo/narnia"));
        assert!(!pattern.is_match("/bar/narnia"));
    }

    #[test]
    fn multiple_params() {
        let Parsed { keys: names, pattern } = compile("/books/:author/:title");
        assert_eq!(names, keys(&["author", "title"]));
        assert!(!pattern.is_match("/books/smith"));
        assert!(!pattern.is_match("/books/smith/"));
        assert!(pattern.is_match("/books/smith/narnia"));
        assert!(pattern.is_match("/books/smith/narnia/"));
        assert!(!pattern.is_match("/books/smith/narnia/reviews"));

        let caps = pattern.exec("/books/smith/narnia").expect("matches");
        assert_eq!(caps.get(1), Some("smith"));
        assert_eq!(caps.get(2), Some("narnia"));
    }

    #[test]
    fn suffix() {
        let Parsed { keys: names, pattern } = compile("/movies/:title.mp4");
        assert_eq!(names, keys(&["title"]));
        assert!(!pattern.is_match("/movies"));
        assert!(!pattern.is_match("/movies/"));
        assert!(!pattern.is_match("/movies/foo"));
        assert!(!pattern.is_match("/movies/foo.mp3"));
        assert!(pattern.is_match("/movies/foo.mp4"));
        assert!(pattern.is_match("/movies/foo.mp4/"));
        assert_eq!(strict("/movies/:title.mp4", "/movies/foo.mp4"), found(&[("title", "foo")]));
    }

    #[test]
    fn suffix_alternatives() {
        let Parsed { keys: names, pattern } = compile("/movies/:title.(mp4|mov)");
        assert_eq!(names, keys(&["title"]));
        assert_eq!(pattern.captures_len(), 1);
        assert!(!pattern.is_match("/movies/foo"));
        assert!(!pattern.is_match("/movies/foo.mp3"));
        assert!(pattern.is_match("/movies/foo.mp4"));
        assert!(pattern.is_match("/movies/foo.mp4/"));
        assert!(pattern.is_match("/movies/foo.mov"));
        assert!(pattern.is_match("/movies/foo.mov/"));
    }

    #[test]
    fn custom_sub_pattern() {
        let Parsed { keys: names, pattern } = compile(r"/users/:id(\d+)/posts");
        assert_eq!(names, keys(&["id"]));
        assert!(pattern.is_match("/users/42/posts"));
        assert!(!pattern.is_match("/users/ada/posts"));
    }

    // ==============================================================================
    // Optional parameters
    // ==============================================================================

    #[test]
    fn optional_param() {
        let Parsed { keys: names, pattern } = compile("/books/:author/:title?");
        assert_eq!(names, keys(&["author", "title"]));
        assert!(!pattern.is_match("/books"));
        assert!(!pattern.is_match("/books/"));
        assert!(pattern.is_match("/books/smith"));
        assert!(pattern.is_match("/books/smith/"));
        assert!(pattern.is_match("/books/smith/narnia"));
        assert!(pattern.is_match("/books/smith/narnia/"));
        assert!(!pattern.is_match("/books/smith/narnia/reviews"));
        assert!(!pattern.is_match("books/smith/narnia"));
    }

    #[test]
    fn optional_param_at_root() {
        let pattern = compile("/:title?").pattern;
        assert!(pattern.is_match("/"));
        assert!(pattern.is_match("/narnia"));
        assert!(pattern.is_match("/narnia/"));
        assert!(!pattern.is_match("/narnia/reviews"));
        assert!(!pattern.is_match("narnia"));
    }

    #[test]
    fn several_optional_params() {
        let Parsed { keys: names, pattern } = compile("/books/:genre/:author?/:title?");
        assert_eq!(names, keys(&["genre", "author", "title"]));
        assert!(!pattern.is_match("/books"));
        assert!(pattern.is_match("/books/horror"));
        assert!(pattern.is_match("/books/horror/"));
        assert!(pattern.is_match("/books/horror/smith"));
        assert!(pattern.is_match("/books/horror/smith/narnia/"));
        assert!(!pattern.is_match("/books/horror/smith/narnia/reviews"));

        assert_eq!(strict("/books/:a/:b?/:c?", "/books/x"), found(&[("a", "x")]));
    }

    // ==============================================================================
    // Wildcards
    // ==============================================================================

    #[test]
    fn wildcard() {
        let Parsed { keys: names, pattern } = compile("/books/*");
        assert_eq!(names, keys(&["wild"]));
        assert!(!pattern.is_match("/books"));
        assert!(pattern.is_match("/books/"));
        assert!(pattern.is_match("/books/narnia"));
        assert!(pattern.is_match("/books/narnia/reviews"));
        assert!(!pattern.is_match("books/narnia"));

        let caps = pattern.exec("/books/narnia/reviews").expect("matches");
        assert_eq!(caps.get(1), Some("narnia/reviews"));
    }

    #[test]
    fn wildcard_at_root() {
        let Parsed { keys: names, pattern } = compile("*");
        assert_eq!(names, keys(&["wild"]));
        assert!(pattern.is_match("/"));
        assert!(pattern.is_match("/narnia"));
        assert!(pattern.is_match("/narnia/reviews"));
        assert!(!pattern.is_match("narnia"));

        let caps = pattern.exec("/foo/bar/baz").expect("matches");
        assert_eq!(caps.get(1), Some("foo/bar/baz"));
    }

    #[test]
    fn optional_wildcard_matches_bare_base() {
        assert_eq!(strict("/books/*?", "/books"), found(&[]));
        assert_eq!(strict("/books/*?", "/books/world"), found(&[("wild", "world")]));
        assert_eq!(strict("/books/*", "/books"), None);
    }

    // ==============================================================================
    // Exec tables
    // ==============================================================================

    #[test]
    fn execs() {
        assert_eq!(strict("/books", "/"), None);
        assert_eq!(strict("/books", "/books"), found(&[]));
        assert_eq!(strict("/books", "/books/"), found(&[]));
        assert_eq!(strict("/books", "/books/world/"), None);
        assert_eq!(strict("/books", "/books/world"), None);

        assert_eq!(strict("/:title", "/hello"), found(&[("title", "hello")]));
        assert_eq!(strict("/:title", "/hello/"), found(&[("title", "hello")]));
        assert_eq!(strict("/:title", "/hello/world/"), None);
        assert_eq!(strict("/:title", "/"), None);

        assert_eq!(strict("/:title?", "/"), found(&[]));
        assert_eq!(strict("/:title?", "/hello"), found(&[("title", "hello")]));
        assert_eq!(strict("/:title?", "/hello/world"), None);

        assert_eq!(strict("/:title.mp4", "/hello.mp4"), found(&[("title", "hello")]));
        assert_eq!(strict("/:title.mp4", "/hello.mp4/"), found(&[("title", "hello")]));
        assert_eq!(strict("/:title.mp4", "/hello.mp4/history"), None);
        assert_eq!(strict("/:title.mp4", "/"), None);

        assert_eq!(
            strict("/:title/:genre", "/hello/world/"),
            found(&[("title", "hello"), ("genre", "world")])
        );
        assert_eq!(strict("/:title/:genre", "/hello/world/mundo"), None);
        assert_eq!(strict("/:title/:genre", "/hello/"), None);

        assert_eq!(strict("/:title/:genre?", "/hello"), found(&[("title", "hello")]));
        assert_eq!(strict("/:title/:genre?", "/hello/"), found(&[("title", "hello")]));
        assert_eq!(
            strict("/:title/:genre?", "/hello/world"),
            found(&[("title", "hello"), ("genre", "world")])
        );
        assert_eq!(strict("/:title/:genre?", "/hello/world/mundo"), None);

        assert_eq!(strict("/books/*", "/books"), None);
        assert_eq!(strict("/books/*", "/books/"), found(&[]));
        assert_eq!(strict("/books/*", "/books/world"), found(&[("wild", "world")]));
        assert_eq!(strict("/books/*", "/books/world/"), found(&[("wild", "world/")]));
        assert_eq!(
            strict("/books/*", "/books/world/howdy/"),
            found(&[("wild", "world/howdy/")])
        );
    }

    #[test]
    fn loose_execs() {
        assert_eq!(loose("/books", "/"), None);
        assert_eq!(loose("/books", "/books"), found(&[]));
        assert_eq!(loose("/books", "/books/"), found(&[]));
        assert_eq!(loose("/books", "/books/world/"), found(&[]));
        assert_eq!(loose("/books", "/books/world"), found(&[]));
        assert_eq!(loose("/books", "/bookshelf"), None);

        assert_eq!(loose("/:title", "/hello"), found(&[("title", "hello")]));
        assert_eq!(loose("/:title", "/hello/world/"), found(&[("title", "hello")]));
        assert_eq!(loose("/:title", "/"), None);

        assert_eq!(loose("/:title?", "/"), found(&[]));
        assert_eq!(loose("/:title?", "/hello/world"), found(&[("title", "hello")]));

        assert_eq!(loose("/:title.mp4", "/hello.mp4/history"), found(&[("title", "hello")]));
        assert_eq!(loose("/:title.mp4", "/"), None);

        assert_eq!(
            loose("/:title/:genre", "/hello/world/mundo"),
            found(&[("title", "hello"), ("genre", "world")])
        );
        assert_eq!(loose("/:title/:genre", "/hello/"), None);

        assert_eq!(loose("/:title/:genre?", "/hello"), found(&[("title", "hello")]));
        assert_eq!(
            loose("/:title/:genre?", "/hello/world/mundo/"),
            found(&[("title", "hello"), ("genre", "world")])
        );

        assert_eq!(loose("/books/*", "/books"), None);
        assert_eq!(loose("/books/*", "/books/"), found(&[]));
        assert_eq!(loose("/books/*", "/books/world/"), found(&[("wild", "world/")]));
        assert_eq!(
            loose("/books/*", "/books/world/howdy"),
            found(&[("wild", "world/howdy")])
        );
    }

    // ==============================================================================
    // Raw exec spans
    // ==============================================================================

    #[test]
    fn raw_exec_strict() {
        assert_eq!(raw("/foo", "/foo", Mode::Strict), Some(("/foo".to_owned(), groups(&[]))));
        assert_eq!(raw("/foo/", "/foo/", Mode::Strict), Some(("/foo/".to_owned(), groups(&[]))));
        assert_eq!(
            raw("/:path", "/foo/", Mode::Strict),
            Some(("/foo/".to_owned(), groups(&[Some("foo")])))
        );
        assert_eq!(
            raw("/:path/:sub?", "/foo", Mode::Strict),
            Some(("/foo".to_owned(), groups(&[Some("foo"), None])))
        );
        assert_eq!(
            raw("/:path/*", "/foo/bar/baz/", Mode::Strict),
            Some(("/foo/bar/baz/".to_owned(), groups(&[Some("foo"), Some("bar/baz/")])))
        );
        assert_eq!(raw("/foo", "/foo/bar", Mode::Strict), None);
        assert_eq!(raw("/:path", "/foo/bar/", Mode::Strict), None);
    }

    #[test]
    fn raw_exec_loose_excludes_terminator() {
        assert_eq!(raw("/foo", "/foo", Mode::Loose), Some(("/foo".to_owned(), groups(&[]))));
        assert_eq!(raw("/foo/", "/foo/", Mode::Loose), Some(("/foo".to_owned(), groups(&[]))));
        assert_eq!(
            raw("/:path", "/foo/", Mode::Loose),
            Some(("/foo".to_owned(), groups(&[Some("foo")])))
        );
        assert_eq!(
            raw("/:path/:sub?", "/foo/", Mode::Loose),
            Some(("/foo".to_owned(), groups(&[Some("foo"), None])))
        );
        assert_eq!(
            raw("/:path/:sub", "/foo/bar/", Mode::Loose),
            Some(("/foo/bar".to_owned(), groups(&[Some("foo"), Some("bar")])))
        );
        assert_eq!(
            raw("/:path/*", "/foo/bar/baz/", Mode::Loose),
            Some(("/foo/bar/baz/".to_owned(), groups(&[Some("foo"), Some("bar/baz/")])))
        );
        assert_eq!(raw("/foo", "/foo/bar", Mode::Loose), Some(("/foo".to_owned(), groups(&[]))));
        assert_eq!(
            raw("/:path", "/foo/bar/", Mode::Loose),
            Some(("/foo".to_owned(), groups(&[Some("foo")])))
        );
    }

    // ==============================================================================
    // Pre-built regex input
    // ==============================================================================

    #[test]
    fn regex_is_passed_through() {
        let regex = Regex::new(r"^/?books").expect("valid regex");
        let parsed = parse(regex.clone(), Mode::Loose).expect("passthrough");

        assert_eq!(parsed.keys, Keys::Unknown);
        assert!(parsed.keys.is_unknown());
        assert_eq!(parsed.pattern.as_str(), regex.as_str());
        assert!(!parsed.pattern.is_loose());
        assert!(parsed.pattern.is_match("/books"));
        assert!(parsed.pattern.is_match("books/"));
    }

    #[test]
    fn regex_named_groups_become_params() {
        let regex = RegexBuilder::new(r"^/(?<year>[0-9]{4})-(?<month>[0-9]{2})/(?<day>[0-9]{2})")
            .case_insensitive(true)
            .build()
            .expect("valid regex");
        let parsed = parse(regex, Mode::Strict).expect("passthrough");

        assert!(!parsed.pattern.is_match("/1234-10/1"));
        assert!(parsed.pattern.is_match("/2019-10/30"));

        let caps = parsed.pattern.exec("/2019-05/30/").expect("matches");
        assert_eq!(caps.as_str(), "/2019-05/30");
        assert_eq!(caps.get(1), Some("2019"));
        assert_eq!(caps.name("month"), Some("05"));

        let params = parsed.exec("/2019-10/02/narnia").expect("matches");
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            vec![("year", "2019"), ("month", "10"), ("day", "02")]
        );
    }

    // ==============================================================================
    // Inject round-trip
    // ==============================================================================

    #[test]
    fn inject_then_match_recovers_values() {
        let cases = [
            ("/books/:title", json!({ "title": "narnia" })),
            ("/books/:author/:title", json!({ "author": "lewis", "title": "narnia" })),
            ("/movies/:title.mp4", json!({ "title": "intro" })),
            ("/:a/static/:b", json!({ "a": "one", "b": "two" })),
        ];

        for (template, values) in cases {
            let path = inject(template, &values).expect("injects");
            let parsed = compile(template);
            let params = parsed.exec(&path).expect("injected path matches");

            let names = parsed.keys.as_slice().expect("named keys");
            assert_eq!(params.len(), names.len(), "{template}");
            for name in names {
                assert_eq!(params.get(name), values[name.as_str()].as_str(), "{template}");
            }
        }
    }

    #[test]
    fn inject_examples() {
        assert_eq!(inject("/foo/:id", &json!({ "id": 123 })).expect("injects"), "/foo/123");
        assert_eq!(
            inject("/foo/:id/:bar?", &json!({ "id": 123 })).expect("injects"),
            "/foo/123"
        );
    }
}
