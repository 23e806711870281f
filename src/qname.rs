// Qualified resource names.
//
// A qualified name is `/namespace/name`, where `name` may itself carry the
// delimiter for package members (`/ns/pkg/action`). Names written without
// the leading delimiter are relative to the namespace configured in the
// property set, or to the anonymous namespace `_`.
//
//      foo          => (_, foo)
//      pkg/foo      => (_, pkg/foo)
//      /ns/foo      => (ns, foo)
//      /ns/pkg/foo  => (ns, pkg/foo)

use crate::error::{Error, Result};
use crate::props::Properties;
use std::fmt;

/// Separator between namespace, package and entity name.
pub const PATH_DELIMITER: char = '/';

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "_";

/// A resource name split into its owning namespace and the remainder.
///
/// `name` is `None` only when the caller resolved a default reference
/// (no name given at all); that case is kept rather than rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QName {
    pub namespace: String,
    pub name: Option<String>,
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{d}{}{d}{}",
            self.namespace,
            self.name.as_deref().unwrap_or_default(),
            d = PATH_DELIMITER
        )
    }
}

/// Namespace stored under `key`, trimmed; `_` when absent or blank.
pub fn resolve_namespace_key(props: &Properties, key: &str) -> String {
    match props.get(key).map(str::trim) {
        Some(ns) if !ns.is_empty() => ns.to_string(),
        _ => DEFAULT_NAMESPACE.to_string(),
    }
}

/// Namespace from the `namespace` property.
pub fn resolve_namespace(props: &Properties) -> String {
    resolve_namespace_key(props, "namespace")
}

/// Split a possibly fully qualified name into namespace and name.
///
/// Delimiter-prefixed names carry their own namespace (the first segment);
/// an empty first segment (`//foo`) falls back to the configured namespace.
/// Anything else is relative to `resolve_namespace(props)` and is returned
/// as the name unchanged.
pub fn parse_qname(qname: Option<&str>, props: &Properties) -> QName {
    match qname.and_then(|q| q.strip_prefix(PATH_DELIMITER)) {
        Some(rest) => {
            let (namespace, name) = rest.split_once(PATH_DELIMITER).unwrap_or((rest, ""));
            let namespace = if namespace.is_empty() {
                resolve_namespace(props)
            } else {
                namespace.to_string()
            };
            QName {
                namespace,
                name: Some(name.to_string()),
            }
        }
        None => QName {
            namespace: resolve_namespace(props),
            name: qname.map(str::to_string),
        },
    }
}

/// Fully qualified `/namespace/name` for `qname`.
///
/// An already qualified `qname` is returned as is and `namespace` is
/// ignored. A `namespace` that starts with the delimiter is used verbatim
/// as the prefix. A missing or empty `namespace` means the default one.
pub fn get_qname(qname: &str, namespace: Option<&str>) -> Result<String> {
    if qname.is_empty() {
        return Err(Error::InvalidArgument(
            "qualified name must not be empty".into(),
        ));
    }
    if qname.starts_with(PATH_DELIMITER) {
        return Ok(qname.to_string());
    }
    match namespace.filter(|ns| !ns.is_empty()) {
        Some(ns) if ns.starts_with(PATH_DELIMITER) => {
            Ok(format!("{}{}{}", ns, PATH_DELIMITER, qname))
        }
        Some(ns) => Ok(format!("{d}{}{d}{}", ns, qname, d = PATH_DELIMITER)),
        None => Ok(format!(
            "{d}{}{d}{}",
            resolve_namespace(&Properties::new()),
            qname,
            d = PATH_DELIMITER
        )),
    }
}
