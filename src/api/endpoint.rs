use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Cache tags. Reads are labelled with the tags they provide; a successful
/// mutation invalidates every read carrying one of its tags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    Auth,
    Elections,
    Results,
    Candidates,
    Positions,
    Coalitions,
    Applications,
    Users,
    Notifications,
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        })
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request template for one backend route. Path segments starting with
/// `:` are filled in from named parameters.
#[derive(Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    /// Tags attached to cached results of this read.
    pub provides: &'static [Tag],
    /// Tags invalidated when this mutation succeeds.
    pub invalidates: &'static [Tag],
}

impl Endpoint {
    pub const fn query(name: &'static str, path: &'static str, provides: &'static [Tag]) -> Self {
        Self {
            name,
            method: Method::Get,
            path,
            provides,
            invalidates: &[],
        }
    }

    pub const fn mutation(
        name: &'static str,
        method: Method,
        path: &'static str,
        invalidates: &'static [Tag],
    ) -> Self {
        Self {
            name,
            method,
            path,
            provides: &[],
            invalidates,
        }
    }

    pub fn is_query(&self) -> bool {
        self.method == Method::Get
    }

    /// Substitute `params` into the path template, yielding unencoded segments.
    pub fn segments(&self, params: &[(&str, &str)]) -> Result<Vec<String>> {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => params
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| value.to_string())
                    .filter(|value| !value.is_empty())
                    .ok_or_else(|| {
                        Error::InvalidRequest(format!(
                            "{} requires a value for `{name}`",
                            self.name
                        ))
                    }),
                None => Ok(segment.to_string()),
            })
            .collect()
    }
}
