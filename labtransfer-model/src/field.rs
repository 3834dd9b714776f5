//! Per-kind field tables: canonical attribute name to typed accessor and
//! mutator closures, built once per kind.

use chrono::NaiveDate;
use labtransfer_types::{DbId, EntityKind};

use crate::record::Record;
use crate::scalar::{format_date, parse_date, Scalar, ScalarType};
use crate::Labeled;

type Getter<T> = Box<dyn Fn(&T) -> Option<Scalar> + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, Scalar) -> bool + Send + Sync>;

/// One generically transferable attribute of `T`.
pub struct FieldDef<T> {
    name: &'static str,
    scalar_type: ScalarType,
    enumeration: bool,
    get: Getter<T>,
    set: Setter<T>,
}

impl<T> FieldDef<T> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    /// Enumeration fields are settable generically but are written by
    /// kind-specific code, never by the generic projection.
    #[must_use]
    pub fn is_enumeration(&self) -> bool {
        self.enumeration
    }

    /// Reads the attribute. Blank text reads as `None`.
    pub fn get(&self, entity: &T) -> Option<Scalar> {
        (self.get)(entity).filter(|v| !v.is_empty())
    }

    /// Coerces `raw` and applies it. Returns false when the value is not
    /// acceptable for this field.
    pub fn set(&self, entity: &mut T, raw: &serde_json::Value) -> bool {
        match self.scalar_type.coerce(raw) {
            Some(value) => (self.set)(entity, value),
            None => false,
        }
    }
}

impl<T> std::fmt::Debug for FieldDef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("scalar_type", &self.scalar_type)
            .field("enumeration", &self.enumeration)
            .finish()
    }
}

/// The ordered field table of one kind (or one publication shape).
#[derive(Debug)]
pub struct FieldTable<T> {
    fields: Vec<FieldDef<T>>,
}

impl<T: 'static> FieldTable<T> {
    #[must_use]
    pub fn builder() -> TableBuilder<T> {
        TableBuilder { fields: Vec::new() }
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&FieldDef<T>> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDef<T>> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Fluent builder for field tables.
pub struct TableBuilder<T> {
    fields: Vec<FieldDef<T>>,
}

impl<T: 'static> TableBuilder<T> {
    fn push(
        mut self,
        name: &'static str,
        scalar_type: ScalarType,
        enumeration: bool,
        get: Getter<T>,
        set: Setter<T>,
    ) -> Self {
        self.fields.push(FieldDef {
            name,
            scalar_type,
            enumeration,
            get,
            set,
        });
        self
    }

    /// Text attribute. Blank input clears it.
    pub fn text(
        self,
        name: &'static str,
        get: impl Fn(&T) -> Option<String> + Send + Sync + 'static,
        set: impl Fn(&mut T, Option<String>) + Send + Sync + 'static,
    ) -> Self {
        self.push(
            name,
            ScalarType::Text,
            false,
            Box::new(move |e: &T| get(e).map(Scalar::Text)),
            Box::new(move |e: &mut T, v: Scalar| match v {
                Scalar::Text(s) => {
                    let s = s.trim();
                    set(e, (!s.is_empty()).then(|| s.to_string()));
                    true
                }
                _ => false,
            }),
        )
    }

    pub fn integer(
        self,
        name: &'static str,
        get: impl Fn(&T) -> Option<i64> + Send + Sync + 'static,
        set: impl Fn(&mut T, i64) + Send + Sync + 'static,
    ) -> Self {
        self.push(
            name,
            ScalarType::Integer,
            false,
            Box::new(move |e: &T| get(e).map(Scalar::Integer)),
            Box::new(move |e: &mut T, v: Scalar| match v {
                Scalar::Integer(i) => {
                    set(e, i);
                    true
                }
                _ => false,
            }),
        )
    }

    pub fn decimal(
        self,
        name: &'static str,
        get: impl Fn(&T) -> Option<f64> + Send + Sync + 'static,
        set: impl Fn(&mut T, f64) + Send + Sync + 'static,
    ) -> Self {
        self.push(
            name,
            ScalarType::Decimal,
            false,
            Box::new(move |e: &T| get(e).map(Scalar::Decimal)),
            Box::new(move |e: &mut T, v: Scalar| match v {
                Scalar::Decimal(d) => {
                    set(e, d);
                    true
                }
                _ => false,
            }),
        )
    }

    pub fn float(
        self,
        name: &'static str,
        get: impl Fn(&T) -> Option<f32> + Send + Sync + 'static,
        set: impl Fn(&mut T, f32) + Send + Sync + 'static,
    ) -> Self {
        self.push(
            name,
            ScalarType::Float,
            false,
            Box::new(move |e: &T| get(e).map(Scalar::Float)),
            Box::new(move |e: &mut T, v: Scalar| match v {
                Scalar::Float(f) => {
                    set(e, f);
                    true
                }
                _ => false,
            }),
        )
    }

    pub fn flag(
        self,
        name: &'static str,
        get: impl Fn(&T) -> bool + Send + Sync + 'static,
        set: impl Fn(&mut T, bool) + Send + Sync + 'static,
    ) -> Self {
        self.push(
            name,
            ScalarType::Bool,
            false,
            Box::new(move |e: &T| Some(Scalar::Bool(get(e)))),
            Box::new(move |e: &mut T, v: Scalar| match v {
                Scalar::Bool(b) => {
                    set(e, b);
                    true
                }
                _ => false,
            }),
        )
    }

    pub fn character(
        self,
        name: &'static str,
        get: impl Fn(&T) -> Option<char> + Send + Sync + 'static,
        set: impl Fn(&mut T, char) + Send + Sync + 'static,
    ) -> Self {
        self.push(
            name,
            ScalarType::Char,
            false,
            Box::new(move |e: &T| get(e).map(Scalar::Char)),
            Box::new(move |e: &mut T, v: Scalar| match v {
                Scalar::Char(c) => {
                    set(e, c);
                    true
                }
                _ => false,
            }),
        )
    }

    /// Date attribute carried as `YYYY-MM-DD` text. Blank input clears it.
    pub fn date(
        self,
        name: &'static str,
        get: impl Fn(&T) -> Option<NaiveDate> + Send + Sync + 'static,
        set: impl Fn(&mut T, Option<NaiveDate>) + Send + Sync + 'static,
    ) -> Self {
        self.push(
            name,
            ScalarType::Text,
            false,
            Box::new(move |e: &T| get(e).map(|d| Scalar::Text(format_date(d)))),
            Box::new(move |e: &mut T, v: Scalar| match v {
                Scalar::Text(s) if s.trim().is_empty() => {
                    set(e, None);
                    true
                }
                Scalar::Text(s) => match parse_date(&s) {
                    Some(d) => {
                        set(e, Some(d));
                        true
                    }
                    None => false,
                },
                _ => false,
            }),
        )
    }

    /// Enumeration attribute. Blank input selects the default member.
    pub fn enumeration<E: Labeled>(
        self,
        name: &'static str,
        get: impl Fn(&T) -> E + Send + Sync + 'static,
        set: impl Fn(&mut T, E) + Send + Sync + 'static,
    ) -> Self {
        self.push(
            name,
            ScalarType::Text,
            true,
            Box::new(move |e: &T| Some(Scalar::Text(get(e).label().to_string()))),
            Box::new(move |e: &mut T, v: Scalar| match v {
                Scalar::Text(s) => match E::parse_label(&s) {
                    Some(value) => {
                        set(e, value);
                        true
                    }
                    None => false,
                },
                _ => false,
            }),
        )
    }

    #[must_use]
    pub fn build(self) -> FieldTable<T> {
        FieldTable {
            fields: self.fields,
        }
    }
}

/// A record kind the transfer engine can project and persist.
pub trait Entity: Clone + Default + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> Option<DbId>;

    fn set_id(&mut self, id: DbId);

    /// Field table governing this instance. Publications pick theirs
    /// from their shape.
    fn fields(&self) -> &'static FieldTable<Self>;

    fn into_record(self) -> Record;

    fn from_record(record: Record) -> Option<Self>;
}
