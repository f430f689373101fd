// # 🧪 Query format engine: parsing, evaluation, extensions, renderers

#[cfg(test)]
mod tests {

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pkghdr_core::{
    constants::MAX_FIELD_WIDTH,
    format::{sprintf, ExtensionRegistry, FormatArg, FormatError, Padding, Template},
    index::{TagIndex, TagValue},
    tags::{self, TagTable},
};

    fn sample() -> TagIndex {
        let mut h = TagIndex::new();
        h.add(tags::NAME, &"bash".into()).unwrap();
        h.add(tags::VERSION, &"5.1".into()).unwrap();
        h.add(tags::SIZE, &TagValue::Int32(vec![4096])).unwrap();
        h.add(tags::BUILDTIME, &TagValue::Int32(vec![1_000_040_000])).unwrap();
        h.add(tags::FILESIZES, &TagValue::Int32(vec![10, 200])).unwrap();
        h.add(tags::FILEMODES, &TagValue::Int16(vec![0o755, 0o644, 0o600])).unwrap();
        h.add(tags::BASENAMES, &TagValue::string_array(["a", "bb", "ccc"])).unwrap();
        h
    }

    fn render(h: &TagIndex, fmt: &str) -> String {
        sprintf(h, fmt, &TagTable::default(), &ExtensionRegistry::with_defaults()).unwrap()
    }

    fn parse_err(fmt: &str) -> FormatError {
        sprintf(&sample(), fmt, &TagTable::default(), &ExtensionRegistry::with_defaults()).unwrap_err()
    }

// ## 1️⃣ Fields and literals

    #[test]
    fn fields_and_literals() {
        let h = sample();
        assert_eq!(render(&h, "%{NAME}-%{VERSION}\n"), "bash-5.1\n");
        assert_eq!(render(&h, "%{rpmtag_name} %{RPMTAG_VERSION}"), "bash 5.1");
        assert_eq!(render(&h, "100%% %{SIZE}"), "100% 4096");
        assert_eq!(render(&h, "%{EPOCH}"), "(none)");
    }

    #[test]
    fn escapes() {
        let h = sample();
        assert_eq!(render(&h, "a\\tb\\n"), "a\tb\n");
        assert_eq!(render(&h, "\\q\\\\"), "q\\");
    }

    #[test]
    fn padding_and_justification() {
        let h = sample();
        assert_eq!(render(&h, "[%{NAME}]"), "bash");
        assert_eq!(render(&h, "|%-6{NAME}|"), "|bash  |");
        assert_eq!(render(&h, "|%6{NAME}|"), "|  bash|");
        assert_eq!(render(&h, "|%-8{EPOCH}|"), "|(none)  |");
    }

    #[test]
    fn oversized_widths_are_capped() {
        let h = sample();
        let out = render(&h, "%999999999{NAME}");
        assert_eq!(out.len(), MAX_FIELD_WIDTH);
        assert!(out.ends_with("bash"));
        assert_eq!(render(&h, "%-99999999999999999999999{NAME}").len(), MAX_FIELD_WIDTH);
    }

    #[test]
    fn integer_types_render_with_sign_rules() {
        let mut h = TagIndex::new();
        h.add(5000, &TagValue::Char(vec![0xff])).unwrap();
        h.add(5001, &TagValue::Int16(vec![0xffff])).unwrap();
        h.add(5002, &TagValue::Int32(vec![0xffff_ffff])).unwrap();
        h.add(5003, &TagValue::Bin(vec![0xde, 0xad])).unwrap();
        let table = TagTable::new([("C8", 5000), ("U16", 5001), ("I32", 5002), ("BLOB", 5003)]);
        let out = sprintf(&h, "%{C8} %{U16} %{I32} %{BLOB}", &table, &ExtensionRegistry::new()).unwrap();
        assert_eq!(out, "-1 65535 -1 dead");

        let out = sprintf(&h, "%{I32:hex} %{I32:octal} %{C8:hex}", &table, &ExtensionRegistry::with_defaults()).unwrap();
        assert_eq!(out, "ffffffff 37777777777 ffffffff");
    }

// ## 2️⃣ Arrays

    #[test]
    fn arrays_iterate_elements_in_parallel() {
        let h = sample();
        assert_eq!(
            render(&h, "[%{BASENAMES} %{FILEMODES:octal}\n]"),
            "a 755\nbb 644\nccc 600\n"
        );
    }

    #[test]
    fn single_values_repeat_and_short_arrays_run_out() {
        let h = sample();
        assert_eq!(render(&h, "[%{=NAME}/%{BASENAMES} ]"), "bash/a bash/bb bash/ccc ");
        assert_eq!(render(&h, "[%{BASENAMES}:%{FILESIZES} ]"), "a:10 bb:200 ccc:(none) ");
        assert_eq!(render(&h, "[%{BASENAMES}:%{SIZE} ]"), "a:4096 bb:4096 ccc:4096 ");
    }

    #[test]
    fn array_count_and_missing_arrays() {
        let h = sample();
        assert_eq!(render(&h, "%{#BASENAMES} %{BASENAMES#}"), "3 3");
        assert_eq!(render(&h, "%{=BASENAMES}"), "a");
        assert_eq!(render(&h, "[%{EPOCH}]"), "(none)");
        assert_eq!(render(&h, "[%{#BASENAMES}]"), "(none)");
    }

// ## 3️⃣ Conditionals

    #[test]
    fn conditionals_choose_by_presence() {
        let mut h = sample();
        assert_eq!(render(&h, "%|EPOCH?{%{EPOCH}:}|%{VERSION}"), "5.1");
        assert_eq!(render(&h, "%|EPOCH?{yes}:{no}|"), "no");

        h.add(tags::EPOCH, &TagValue::Int32(vec![2])).unwrap();
        assert_eq!(render(&h, "%|EPOCH?{%{EPOCH}:}|%{VERSION}"), "2:5.1");
        assert_eq!(render(&h, "%|EPOCH?{yes}:{no}|"), "yes");
    }

// ## 4️⃣ Renderers

    #[test]
    fn builtin_renderers() {
        let h = sample();
        assert_eq!(render(&h, "%{SIZE:hex} %{SIZE:octal}"), "1000 10000");
        assert_eq!(render(&h, "%{NAME:octal}"), "(not a number)");
        assert_eq!(render(&h, "%{NAME:shescape}"), "'bash'");
        assert_eq!(render(&h, "%{BUILDTIME:day}"), "Sun Sep 09 2001");
        assert_eq!(render(&h, "%{NAME:date}"), "(not a number)");
    }

    #[test]
    fn unknown_renderer_falls_back_to_default() {
        assert_eq!(render(&sample(), "%{NAME:bogus}"), "bash");
    }

    #[test]
    fn custom_renderer_receives_padding() {
        let mut reg = ExtensionRegistry::with_defaults();
        reg.register_renderer("upper", |arg: &FormatArg<'_>, pad: &Padding| match arg {
            FormatArg::Text(s) => pad.apply(&s.to_uppercase()),
            _ => String::from("?"),
        });
        let out = sprintf(&sample(), "%-5{NAME:upper}|%{SIZE:upper}", &TagTable::default(), &reg).unwrap();
        assert_eq!(out, "BASH |?");
    }

// ## 5️⃣ Virtual tags

    #[test]
    fn virtual_tags_are_cached_per_render() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut reg = ExtensionRegistry::with_defaults();
        reg.register_tag("nvr", move |h: &TagIndex| {
            counter.fetch_add(1, Ordering::SeqCst);
            let name = h.get(tags::NAME)?;
            let version = h.get(tags::VERSION)?;
            Some(TagValue::String(format!("{}-{}", name.as_str()?, version.as_str()?)))
        });

        let tpl = Template::parse("%{NVR} %{nvr} %|NVR?{ok}|", &TagTable::default(), &reg).unwrap();
        assert_eq!(tpl.render(&sample()), "bash-5.1 bash-5.1 ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(tpl.render(&TagIndex::new()), "(none) (none) ");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn virtual_tags_shadow_header_tags() {
        let mut reg = ExtensionRegistry::new();
        reg.register_tag("NAME", |_: &TagIndex| Some(TagValue::from("virtual")));
        let out = sprintf(&sample(), "%{NAME}", &TagTable::default(), &reg).unwrap();
        assert_eq!(out, "virtual");
    }

    #[test]
    fn i18n_fields_use_index_locale() {
        let mut h = sample();
        h.add_i18n_string(tags::SUMMARY, "shell", None).unwrap();
        h.add_i18n_string(tags::SUMMARY, "coquille", Some("fr")).unwrap();
        assert_eq!(render(&h, "%{SUMMARY}"), "shell");
        h.set_locale(Some("fr_CA".into()));
        assert_eq!(render(&h, "%{SUMMARY}"), "coquille");
    }

// ## 6️⃣ Parse errors

    #[test]
    fn parse_errors_carry_historical_messages() {
        assert_eq!(parse_err("%NAME"), FormatError::MissingOpenBrace);
        assert_eq!(parse_err("%{NAME"), FormatError::MissingCloseBrace);
        assert_eq!(parse_err("%{}"), FormatError::EmptyTagName);
        assert_eq!(parse_err("%{NAME:}"), FormatError::EmptyTagFormat);
        assert_eq!(parse_err("%{NOPE}"), FormatError::UnknownTag("NOPE".into()));
        assert_eq!(parse_err("[%{NAME}"), FormatError::ArrayNotClosed);
        assert_eq!(parse_err("a]"), FormatError::UnexpectedBracket);
        assert_eq!(parse_err("a}"), FormatError::UnexpectedBrace);
        assert_eq!(parse_err("%|NAME"), FormatError::QuestionExpected);
        assert_eq!(parse_err("%|NAME?x"), FormatError::OpenBraceAfterQuestion);
        assert_eq!(parse_err("%|NAME?{x"), FormatError::ExpressionNotClosed);
        assert_eq!(parse_err("%|NAME?{x}"), FormatError::ColonExpected);
        assert_eq!(parse_err("%|NAME?{x}:y"), FormatError::OpenBraceAfterColon);
        assert_eq!(parse_err("%|NAME?{x}:{y}"), FormatError::PipeExpected);
        assert_eq!(parse_err("%|NOPE?{x}|"), FormatError::UnknownTag("NOPE".into()));

        assert_eq!(FormatError::MissingOpenBrace.to_string(), "missing { after %");
        assert_eq!(FormatError::MissingCloseBrace.to_string(), "missing } after %{");
        assert_eq!(FormatError::ColonExpected.to_string(), ": expected following ? subexpression");
    }
}
