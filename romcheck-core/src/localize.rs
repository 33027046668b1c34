use crate::report::Counts;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use unic_langid::LanguageIdentifier;

const EN_GB: &str = include_str!("../i18n/en-GB.ftl");

/// Console messages, looked up in a Fluent bundle built from `../i18n`.
pub struct Messages {
    bundle: FluentBundle<FluentResource>,
}

impl Messages {
    /// Only en-GB ships today; other tags reuse its strings.
    pub fn builtin(lang: &str) -> Self {
        let langid: LanguageIdentifier =
            lang.parse().or_else(|_| "en-GB".parse()).unwrap_or_default();

        let mut bundle = FluentBundle::new(vec![langid]);
        // Terminal output: no bidi isolation marks around arguments.
        bundle.set_use_isolating(false);
        match FluentResource::try_new(EN_GB.to_owned()) {
            Ok(res) => {
                if let Err(errs) = bundle.add_resource(res) {
                    tracing::warn!(?errs, "conflicting messages in built-in resources");
                }
            }
            Err((_, errs)) => tracing::warn!(?errs, "invalid built-in FTL resource"),
        }
        Self { bundle }
    }

    /// Format message `id` with named string args. Unknown ids and
    /// formatting failures yield the id itself.
    pub fn get(&self, id: &str, args: &[(&str, &str)]) -> String {
        let Some(pattern) = self.bundle.get_message(id).and_then(|m| m.value()) else {
            return id.to_string();
        };
        let mut fa = FluentArgs::new();
        for (k, v) in args {
            fa.set(*k, FluentValue::from(*v));
        }
        let mut errs = vec![];
        let s = self.bundle.format_pattern(pattern, Some(&fa), &mut errs);
        if errs.is_empty() {
            s.into_owned()
        } else {
            id.to_string()
        }
    }

    pub fn summary(&self, counts: &Counts) -> String {
        let values = [
            counts.verified.to_string(),
            counts.bad_dumps.to_string(),
            counts.missing.to_string(),
            counts.unknown.to_string(),
            counts.errored.to_string(),
        ];
        let keys = ["verified", "bad", "missing", "unknown", "errored"];
        let args: Vec<(&str, &str)> =
            keys.iter().copied().zip(values.iter().map(String::as_str)).collect();
        self.get("verify-summary", &args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_without_isolation_marks() {
        let m = Messages::builtin("en-GB");
        assert_eq!(
            m.get("verify-complete", &[("path", "report.txt")]),
            "Verification complete! Report written to report.txt"
        );
        let counts = Counts { verified: 1, bad_dumps: 2, missing: 3, unknown: 4, errored: 0 };
        assert_eq!(
            m.summary(&counts),
            "Verified: 1, Bad dumps: 2, Missing: 3, Unknown: 4, Errors: 0"
        );
    }

    #[test]
    fn unknown_id_and_language_fall_back() {
        let m = Messages::builtin("not a language tag");
        assert_eq!(m.get("no-such-message", &[]), "no-such-message");
        assert_eq!(m.get("verify-start", &[]), "Verifying ROMs...");
    }
}
