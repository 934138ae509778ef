//! PHP rules, the per-method variable rules and the placeholder escape

use crate::rules::{Rule, RuleCatalog};
use transpile_core::{ErrorHierarchy, TranspileResult};

/// `{identifier}` placeholders are hidden behind this form while brace rules run.
/// The underscores keep the sigil rules from ever touching the name inside.
const PLACEHOLDER_ESCAPE: (&str, &str) = (r"\{([a-zA-Z0-9_]+?)\}", "~_${1}_~");
const PLACEHOLDER_RESTORE: (&str, &str) = (r"~_([a-zA-Z0-9_]+?)_~", "{${1}}");

/// Single-line `{ ... }` literals, innermost reached one level per pass
pub const BRACE_LINE_PATTERN: &str = r"\{([^\n}]+)\}";
/// `{ ... }` literals followed by a non-space, may span lines
pub const BRACE_BLOCK_PATTERN: &str = r"\{([^;{]+?)\}(\S)";
/// `[ ... ]` literals written with inner padding
pub const BRACKET_PATTERN: &str = r"\[(\s[^\]]+?\s)\]";

/// The bounded collection-literal rules, one entry each
pub const COLLECTION_RULES: [(&str, &str); 3] = [
    (BRACE_LINE_PATTERN, "array(${1})"),
    (BRACE_BLOCK_PATTERN, "array (${1})${2}"),
    (BRACKET_PATTERN, "array (${1})"),
];

const PRE_COMMON: &[(&str, &str)] = &[
    (
        r"Array\.isArray\s*\(([^)]+)\)",
        "gettype (${1}) === 'array' && count (array_filter (array_keys (${1}), 'is_string')) == 0",
    ),
    (r"typeof\s+([^\s\[]+)(?:\s|\[(.+?)\])\s+===?\s+'undefined'", "${1}[${2}] === null"),
    (r"typeof\s+([^\s\[]+)(?:\s|\[(.+?)\])\s+!==?\s+'undefined'", "${1}[${2}] !== null"),
    (r"typeof\s+(\S+)\s+===?\s+'undefined'", "${1} === null"),
    (r"typeof\s+(\S+)\s+!==?\s+'undefined'", "${1} !== null"),
    (r"typeof\s+(.+?)\s+===?\s+'undefined'", "${1} === null"),
    (r"typeof\s+(.+?)\s+!==?\s+'undefined'", "${1} !== null"),
    (r"([^\s\[]+)(?:\s|\[(.+?)\])\s+===?\s+undefined", "${1}[${2}] === null"),
    (r"([^\s\[]+)(?:\s|\[(.+?)\])\s+!==?\s+undefined", "${1}[${2}] !== null"),
    (r"(\S+)\s+===?\s+undefined", "${1} === null"),
    (r"(\S+)\s+!==?\s+undefined", "${1} !== null"),
    (r"(.+?)\s+===?\s+undefined", "${1} === null"),
    (r"(.+?)\s+!==?\s+undefined", "${1} !== null"),
    (r"typeof\s+([^\s\[]+)(?:\s|\[(.+?)\])\s+===?\s+'string'", "gettype (${1}[${2}]) === 'string'"),
    (r"typeof\s+([^\s\[]+)(?:\s|\[(.+?)\])\s+!==?\s+'string'", "gettype (${1}[${2}]) !== 'string'"),
    (r"typeof\s+(\S+)\s+===?\s+'string'", "gettype (${1}) === 'string'"),
    (r"typeof\s+(\S+)\s+!==?\s+'string'", "gettype (${1}) !== 'string'"),
    (r"undefined", "null"),
    (r"this\.extend", "array_merge"),
    (r"this\.stringToBinary\s*\((.*)\)", "${1}"),
    (r"this\.stringToBase64", "base64_encode"),
    (r"this\.binaryToBase16\s", "bin2hex"),
    (r"this\.base64ToBinary", "base64_decode"),
    (r"this\.deepExtend", "array_replace_recursive"),
    (r"(\w+)\.shift\s*\(\)", "array_shift(${1})"),
    (r"(\w+)\.pop\s*\(\)", "array_pop(${1})"),
];

const MEMBER_ACCESS: &[(&str, &str)] = &[
    (r"this\.", "$$this->"),
    (r" this;", " $$this;"),
    (r"([^'])this_\.", "${1}$$this_->"),
    (r"\{\}", "array()"),
    (r"\[\]", "array()"),
];

const STATEMENTS: &[(&str, &str)] = &[
    (r"(^|[^a-zA-Z0-9_])(?:let|const|var)\s\[\s*([^\]]+)\s\]", "${1}list(${2})"),
    (r"(^|[^a-zA-Z0-9_])(?:let|const|var)\s\{\s*([^}]+)\s\}", "${1}array_values(list(${2}))"),
    (r"(^|[^a-zA-Z0-9_])(?:let|const|var)\s", "${1}"),
    (r"Object\.keys\s*\((.*)\)\.length", "${1}"),
    (r"Object\.keys\s*\((.*)\)", "is_array(${1}) ? array_keys(${1}) : array()"),
    (r"(\S+\s*\(\))\.toString \(\)", "(string) ${1}"),
    (r"(\S+)\.toString \(\)", "(string) ${1}"),
    (r"throw new Error \((.*)\)", "throw new \\Exception(${1})"),
    (r"throw new (\S+) \((.*)\)", "throw new ${1}(${2})"),
    (r"throw (\S+);", "throw $$${1};"),
];

const LOOPS_AND_CALLS: &[(&str, &str)] = &[
    (r"\}\s+catch \((\S+)\) \{", "} catch (Exception $$${1}) {"),
    (
        r"for\s+\(([a-zA-Z0-9_]+)\s*=\s*([^;\s]+\s*);[^<>=]+(<=|>=|<|>)\s*(.*)\.length\s*;([^)]+)\)\s*\{",
        "for (${1} = ${2}; ${1} ${3} count (${4});${5}) {",
    ),
    (
        r"for\s+\(([a-zA-Z0-9_]+)\s*=\s*([^;\s]+\s*);[^<>=]+(<=|>=|<|>)\s*(.*)\s*;([^)]+)\)\s*\{",
        "for (${1} = ${2}; ${1} ${3} ${4};${5}) {",
    ),
    (r"(\S+)\.length;", "is_array (${1}) ? count (${1}) : 0;"),
    (r"([^\s(]+)\.length", "strlen (${1})"),
    (r"\.push\s*\(([\s\S]+?)\);", "[] = ${1};"),
    (r"(\s)await(\s)", "${1}"),
    (r"(\S): ", "${1} => "),
];

const JOIN_LITERAL: &[(&str, &str)] = &[(
    r"\[\s*([^\]]+?)\s*\]\.join\s*\(\s*([^)]+?)\s*\)",
    "implode(${2}, array(${1}))",
)];

const LIBRARY_CALLS: &[(&str, &str)] = &[
    (r"JSON\.stringify", "json_encode"),
    (r"JSON\.parse\s+\(([^)]+)\)", "json_decode(${1}, $$as_associative_array = true)"),
    (r"([^(\s]+)\.includes\s+\(([^)]+)\)", "mb_strpos(${1}, ${2})"),
    (r"(\S+)\.toFixed\s*\(([0-9]+)\)", "sprintf('%.${2}f', ${1})"),
    (r"(\S+)\.toFixed\s*\(([^)]+)\)", "sprintf('%.' . ${2} . 'f', ${1})"),
    (r"parseFloat\s", "floatval "),
    (r"parseInt\s", "intval "),
    (r" \+ ", " . "),
    (r" \+= ", " .= "),
    (r"([^\s(]+(?:\s*\(.+\))?)\.toUpperCase\s*\(\)", "strtoupper(${1})"),
    (r"([^\s(]+(?:\s*\(.+\))?)\.toLowerCase\s*\(\)", "strtolower(${1})"),
    (r"([^\s(]+(?:\s*\(.+\))?)\.replace\s*\(([^)]+)\)", "str_replace(${2}, ${1})"),
    (r"this\[([^\]+]+)\]", "$$this->$$${1}"),
    (r"([^\s(]+)\.slice \(([^):,]+)\)", "mb_substr(${1}, ${2})"),
    (r"([^\s(]+)\.slice \(([^,)]+),\s*([^)]+)\)", "mb_substr(${1}, ${2}, ${3} - ${2})"),
    (r"([^\s(]+)\.split \(('[^']*'|[^,]+?)\)", "explode(${2}, ${1})"),
    (r"Math\.floor\s*\(([^)]+)\)", "(int) floor(${1})"),
    (r"Math\.abs\s*\(([^)]+)\)", "abs (${1})"),
    (r"Math\.round\s*\(([^)]+)\)", "(int) round(${1})"),
    (r"Math\.ceil\s*\(([^)]+)\)", "(int) ceil(${1})"),
    (r"Math\.pow\s*\(([^)]+)\)", "pow(${1})"),
    (r"Math\.log", "log"),
    (r"([^(\s]+)\s+%\s+([^\s)]+)", "fmod(${1}, ${2})"),
    (r"\(([^\s(]+)\.indexOf\s*\(([^)]+)\)\s*>=\s*0\)", "(mb_strpos(${1}, ${2}) !== false)"),
    (r"([^\s(]+)\.indexOf\s*\(([^)]+)\)\s*>=\s*0", "mb_strpos(${1}, ${2}) !== false"),
    (r"([^\s(]+)\.indexOf\s*\(([^)]+)\)", "mb_strpos(${1}, ${2})"),
    (r"\(([^\s(]+)\sin\s([^)]+)\)", "(is_array(${2}) && array_key_exists(${1}, ${2}))"),
    (r"(\S+)\.join\s*\(\s*([^)]+?)\s*\)", "implode(${2}, ${1})"),
    (r"new ccxt\.", "new \\ccxt\\"),
    (r"Math\.(max|min)", "${1}"),
    (r"console\.log", "var_dump"),
    (r"process\.exit", "exit"),
    (r"super\.", "parent::"),
];

/// Qualify bare exception-class names used as values (`'code': InvalidOrder,`)
/// with the target namespace
fn error_names_rule(hierarchy: &ErrorHierarchy) -> TranspileResult<Option<Rule>> {
    if hierarchy.is_empty() {
        return Ok(None);
    }
    let mut names: Vec<&str> = hierarchy.names().collect();
    // longest first so no name shadows another that extends it
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    Rule::new(
        &format!(r"([^a-z]+) ({})(\S)", alternation),
        r"${1} '\\ccxt\\${2}'${3}",
    )
    .map(Some)
}

/// The full PHP body catalog. Placeholders stay escaped in its output;
/// [`placeholder_restore`] runs after the per-method variable rules.
pub fn php_catalog(
    common: &RuleCatalog,
    hierarchy: &ErrorHierarchy,
    nesting_passes: usize,
) -> TranspileResult<RuleCatalog> {
    let escape = RuleCatalog::from_table("php-placeholders", &[PLACEHOLDER_ESCAPE])?;
    let pre = RuleCatalog::from_table("php-pre", PRE_COMMON)?;

    let member_access = RuleCatalog::from_table("php-member-access", MEMBER_ACCESS)?;
    let brace_lines =
        RuleCatalog::repeated("php-brace-lines", COLLECTION_RULES[0].0, COLLECTION_RULES[0].1, nesting_passes)?;

    let mut statements = RuleCatalog::from_table("php-statements", STATEMENTS)?;
    if let Some(rule) = error_names_rule(hierarchy)? {
        statements.push(rule);
    }

    let loops = RuleCatalog::from_table("php-loops", LOOPS_AND_CALLS)?;
    let brace_blocks = RuleCatalog::repeated(
        "php-brace-blocks",
        COLLECTION_RULES[1].0,
        COLLECTION_RULES[1].1,
        nesting_passes,
    )?;
    let join_literal = RuleCatalog::from_table("php-join", JOIN_LITERAL)?;
    let brackets =
        RuleCatalog::repeated("php-brackets", COLLECTION_RULES[2].0, COLLECTION_RULES[2].1, nesting_passes)?;
    let library = RuleCatalog::from_table("php-library", LIBRARY_CALLS)?;

    Ok(RuleCatalog::compose(
        "php",
        &[
            &escape,
            &pre,
            common,
            &member_access,
            &brace_lines,
            &statements,
            &loops,
            &brace_blocks,
            &join_literal,
            &brackets,
            &library,
        ],
    ))
}

/// Turn escaped placeholders back into `{identifier}`
pub fn placeholder_restore() -> TranspileResult<RuleCatalog> {
    RuleCatalog::from_table("php-placeholders", &[PLACEHOLDER_RESTORE])
}

/// Sigil and property-access rules for one method's bindings.
///
/// `names` must already have been through the common catalog so they match
/// the renamed body. The sigil rule runs twice because adjacent occurrences
/// share the delimiter between them.
pub fn variable_rules(names: &[String]) -> TranspileResult<RuleCatalog> {
    let mut sigils = Vec::with_capacity(names.len());
    let mut properties = Vec::with_capacity(names.len());

    for name in names {
        let escaped = regex::escape(name);
        sigils.push(Rule::new(
            &format!(r"(^|[^$a-zA-Z0-9.>'_/]){}([^a-zA-Z0-9'_/])", escaped),
            &format!("${{1}}$${}${{2}}", name),
        )?);
        properties.push(Rule::new(
            &format!(r"(^|[^a-zA-Z0-9.>'_]){}\.", escaped),
            &format!("${{1}}{}->", name),
        )?);
    }

    let mut rules = sigils.clone();
    rules.extend(sigils);
    rules.extend(properties);
    Ok(RuleCatalog::from_rules("php-variables", rules))
}
