//! camelCase → snake_case conversion and the curated call-site rename registry

use crate::rules::{Rule, RuleCatalog};
use regex::{Captures, Regex};
use transpile_core::TranspileResult;

/// Converts canonical camelCase identifiers into snake_case
#[derive(Debug, Clone)]
pub struct CaseConverter {
    all_caps: Regex,
    lower_upper: Regex,
    acronym_word: Regex,
    trailing_digit: Regex,
}

impl CaseConverter {
    pub fn new() -> TranspileResult<Self> {
        Ok(Self {
            all_caps: Regex::new(r"^[A-Z0-9_]+$")?,
            lower_upper: Regex::new(r"[a-z0-9][A-Z]")?,
            acronym_word: Regex::new(r"[A-Z0-9][A-Z0-9][a-z][^$]")?,
            trailing_digit: Regex::new(r"[a-z][0-9]$")?,
        })
    }

    /// `fetchL2OrderBook` → `fetch_l2_order_book`, `parseOHLCV` → `parse_ohlcv`.
    /// Identifiers that are already all caps come back unchanged.
    pub fn un_camel_case(&self, identifier: &str) -> String {
        if self.all_caps.is_match(identifier) {
            return identifier.to_string();
        }

        let split_after_first = |caps: &Captures| {
            let matched = &caps[0];
            format!("{}_{}", &matched[..1], &matched[1..])
        };

        let step = self.lower_upper.replace_all(identifier, split_after_first);
        let step = self.acronym_word.replace_all(&step, split_after_first);
        let step = self.trailing_digit.replace_all(&step, split_after_first);
        step.to_lowercase()
    }
}

/// API method names shared across all dialects, renamed at every call site
const CURATED_NAMES: &[&str] = &[
    "deepExtend",
    "safeFloat2",
    "safeInteger2",
    "safeIntegerProduct2",
    "safeTimestamp2",
    "safeString2",
    "safeStringLower2",
    "safeStringUpper2",
    "safeValue2",
    "safeFloat",
    "safeInteger",
    "safeIntegerProduct",
    "safeTimestamp",
    "safeString",
    "safeStringLower",
    "safeStringUpper",
    "safeValue",
    "inArray",
    "toArray",
    "isEmpty",
    "arrayConcat",
    "binaryConcat",
    "binaryConcatArray",
    "binaryToString",
    "precisionFromString",
    "implodeParams",
    "extractParams",
    "parseBalance",
    "parseOHLCVs",
    "parseOHLCV",
    "parseDate",
    "parseLedgerEntry",
    "parseLedger",
    "parseTicker",
    "parseTimeframe",
    "parseTradesData",
    "parseTrades",
    "parseTrade",
    "parseTradingViewOHLCV",
    "parseTransaction",
    "parseTransactions",
    "parseOrderBook",
    "parseBidsAsks",
    "parseBidAsk",
    "parseOrders",
    "parseOrderStatus",
    "parseOrder",
    "parseJson",
    "filterByArray",
    "filterBySymbolSinceLimit",
    "filterBySinceLimit",
    "filterBySymbol",
    "getVersionString",
    "indexBy",
    "sortBy",
    "filterBy",
    "groupBy",
    "findMarket",
    "findSymbol",
    "marketIds",
    "marketId",
    "fetchFundingFees",
    "fetchTradingFees",
    "fetchTradingFee",
    "fetchFees",
    "fetchL2OrderBook",
    "fetchOrderBook",
    "fetchMyTrades",
    "fetchOrderStatus",
    "fetchOpenOrders",
    "fetchOpenOrder",
    "fetchOrders",
    "fetchOrderTrades",
    "fetchOrder",
    "fetchBidsAsks",
    "fetchTickers",
    "fetchTicker",
    "fetchCurrencies",
    "numberToString",
    "decimalToPrecision",
    "priceToPrecision",
    "amountToPrecision",
    "amountToLots",
    "feeToPrecision",
    "currencyToPrecision",
    "costToPrecision",
    "commonCurrencyCode",
    "loadAccounts",
    "loadFees",
    "loadMarkets",
    "fetchMarkets",
    "appendInactiveMarkets",
    "fetchCategories",
    "calculateFee",
    "editLimitBuyOrder",
    "editLimitSellOrder",
    "editLimitOrder",
    "editOrder",
    "encodeURIComponent",
    "throwExceptionOnError",
    "handleErrors",
    "checkRequiredCredentials",
    "checkRequiredDependencies",
    "checkAddress",
    "convertTradingViewToOHLCV",
    "convertOHLCVToTradingView",
    "signBodyWithSecret",
    "isJsonEncodedObject",
    "setSandboxMode",
    "safeCurrencyCode",
    "roundTimeframe",
    "integerDivide",
    "integerModulo",
    "integerPow",
    "base16ToBinary",
];

/// A single camelCase → snake_case mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierEntry {
    pub camel: String,
    pub snake: String,
}

/// Explicit rename table, injected into the renderers
#[derive(Debug, Clone)]
pub struct IdentifierRegistry {
    entries: Vec<IdentifierEntry>,
}

impl IdentifierRegistry {
    /// The curated API surface
    pub fn curated() -> TranspileResult<Self> {
        Self::from_names(CURATED_NAMES.iter().copied())
    }

    pub fn from_names<'a, I: IntoIterator<Item = &'a str>>(names: I) -> TranspileResult<Self> {
        let converter = CaseConverter::new()?;
        let entries = names
            .into_iter()
            .map(|camel| IdentifierEntry {
                camel: camel.to_string(),
                snake: converter.un_camel_case(camel),
            })
            .collect();
        Ok(Self { entries })
    }

    /// Rules renaming `.camel (` call sites while still in canonical member syntax.
    ///
    /// The whitespace before the argument list is kept; each target decides
    /// its own spacing later.
    pub fn call_site_rules(&self) -> TranspileResult<RuleCatalog> {
        let rules = self
            .entries
            .iter()
            .map(|entry| {
                Rule::new(
                    &format!(r"\.{}(\s*\()", regex::escape(&entry.camel)),
                    &format!(".{}${{1}}", entry.snake),
                )
            })
            .collect::<TranspileResult<Vec<_>>>()?;
        Ok(RuleCatalog::from_rules("identifier-registry", rules))
    }
}

/// Rename `<receiver>name (` call sites of the given methods to snake_case.
///
/// `receiver` is a regex fragment for the target's member access
/// (`self\.` or `this->`); `separator` is what goes between the new name and
/// the opening parenthesis.
pub fn rename_method_calls(
    text: &str,
    methods: &[&str],
    receiver: &str,
    receiver_literal: &str,
    separator: &str,
    converter: &CaseConverter,
) -> TranspileResult<String> {
    let mut renamed = text.to_string();
    for method in methods {
        let pattern = Regex::new(&format!(r"{}({})\s*\(", receiver, regex::escape(method)))?;
        renamed = pattern
            .replace_all(&renamed, |caps: &Captures| {
                format!("{}{}{}(", receiver_literal, converter.un_camel_case(&caps[1]), separator)
            })
            .into_owned();
    }
    Ok(renamed)
}
