use std::borrow::Cow;
use std::fmt;

/// Value substituted for a `{name}` placeholder.
///
/// Values are rendered with their `Display` form; no locale-aware number
/// formatting is applied.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! arg_value_from {
    ($variant:ident as $target:ty: $($src:ty),+) => {
        $(
            impl From<$src> for ArgValue {
                fn from(v: $src) -> Self {
                    Self::$variant(v as $target)
                }
            }
        )+
    };
}

arg_value_from!(Int as i64: i8, i16, i32, i64, u8, u16, u32, usize);
arg_value_from!(Float as f64: f32, f64);

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<&String> for ArgValue {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

/// A dotted translation path together with its placeholder arguments.
///
/// Arguments keep insertion order; substitution applies them in that order.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub path: Cow<'static, str>,
    pub args: Vec<(Cow<'static, str>, ArgValue)>,
}

impl Message {
    pub fn new(path: impl Into<Cow<'static, str>>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
        }
    }

    /// Append one placeholder argument.
    pub fn arg(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<ArgValue>) -> Self {
        self.args.push((name.into(), value.into()));
        self
    }

    /// Append several placeholder arguments, in iteration order.
    pub fn with_args<I, K, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cow<'static, str>>,
        V: Into<ArgValue>,
    {
        self.args
            .extend(args.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// The same message with its path nested under `base` (`base.path`).
    /// An empty base leaves the path unchanged.
    pub fn scoped(&self, base: &str) -> Self {
        if base.is_empty() {
            return self.clone();
        }
        Self {
            path: Cow::Owned(format!("{base}.{}", self.path)),
            args: self.args.clone(),
        }
    }

    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }
}

impl From<&'static str> for Message {
    fn from(path: &'static str) -> Self {
        Self::new(path)
    }
}

impl From<String> for Message {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}
