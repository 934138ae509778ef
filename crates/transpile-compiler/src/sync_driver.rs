//! Derives the synchronous Python test driver from the asynchronous one.
//!
//! This is a line filter, not a catalog pass: each substitution replaces the
//! first occurrence on a line and nothing is reparsed.

use crate::files;
use regex::Regex;
use std::path::Path;
use transpile_core::TranspileResult;

const LINE_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("asyncio.get_event_loop().run_until_complete(main())", "main()"),
    ("import ccxt.async_support as ccxt", "import ccxt"),
    ("await asyncio.sleep", "time.sleep"),
    ("async ", ""),
    ("await ", ""),
];

/// Helpers that only exist in the asynchronous driver
const ASYNC_ONLY_FUNCTIONS: &[&str] = &["test_tickers_async", "test_l2_order_books_async"];

pub struct SyncDriverDeriver {
    token_bucket: Regex,
    removals: Vec<(Regex, Regex)>,
}

impl SyncDriverDeriver {
    pub fn new() -> TranspileResult<Self> {
        let removals = ASYNC_ONLY_FUNCTIONS
            .iter()
            .map(|name| {
                let escaped = regex::escape(name);
                // the definition pattern runs up to the next comment, not just the function
                let definition = Regex::new(&format!(r"def {}[^#]+", escaped))?;
                let call_site = Regex::new(&format!(r"\s+{}\(exchange\)", escaped))?;
                Ok((definition, call_site))
            })
            .collect::<TranspileResult<Vec<_>>>()?;

        Ok(Self {
            token_bucket: Regex::new(r".*token_bucket.*")?,
            removals,
        })
    }

    pub fn derive(&self, async_source: &str) -> String {
        let lines: Vec<String> = async_source
            .split('\n')
            .filter(|line| *line != "import asyncio")
            .map(|line| {
                let line = LINE_SUBSTITUTIONS
                    .iter()
                    .take(2)
                    .fold(line.to_string(), |acc, (from, to)| acc.replacen(from, to, 1));
                let line = self.token_bucket.replace_all(&line, "").into_owned();
                LINE_SUBSTITUTIONS
                    .iter()
                    .skip(2)
                    .fold(line, |acc, (from, to)| acc.replacen(from, to, 1))
            })
            .collect();

        self.removals
            .iter()
            .fold(lines.join("\n"), |text, (definition, call_site)| {
                let text = definition.replace_all(&text, "");
                call_site.replace_all(&text, "").into_owned()
            })
    }

    /// Read `async_path`, write the derived driver to `sync_path`
    pub fn derive_file(&self, async_path: &Path, sync_path: &Path) -> TranspileResult<()> {
        log::info!("Transpiling {} → {}", async_path.display(), sync_path.display());
        let source = files::read_file(async_path)?;
        files::overwrite_file(sync_path, &self.derive(&source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASYNC_DRIVER: &str = "import asyncio
import ccxt.async_support as ccxt  # noqa: E402

async def test_tickers_async(exchange):
    await exchange.fetch_tickers()

# ------------------------------------------------------------------------------

async def test_exchange(exchange):
    await exchange.load_markets()
    exchange.token_bucket = {}
    await asyncio.sleep(exchange.rateLimit / 1000)
    await test_tickers_async(exchange)

asyncio.get_event_loop().run_until_complete(main())";

    #[test]
    fn test_derives_sync_driver() {
        let derived = SyncDriverDeriver::new().unwrap().derive(ASYNC_DRIVER);

        assert!(!derived.contains("import asyncio\n"));
        assert!(derived.starts_with("import ccxt  # noqa: E402\n"));
        assert!(derived.contains("def test_exchange(exchange):\n    exchange.load_markets()\n\n    time.sleep(exchange.rateLimit / 1000)"));
        assert!(!derived.contains("test_tickers_async"));
        assert!(!derived.contains("await"));
        assert!(!derived.contains("token_bucket"));
        assert!(derived.ends_with("\nmain()"));
    }

    #[test]
    fn test_only_first_occurrence_per_line() {
        let derived = SyncDriverDeriver::new().unwrap().derive("x = 'async async '");
        assert_eq!(derived, "x = 'async '");
    }
}
