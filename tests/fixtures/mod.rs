//! Types shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use beancheck::{
    data_object, enumeration, params, Args, DataObject, Enumeration, Fault, Instance, Reflect, TypeBuilder,
    TypeRef, TypeRegistry, Value,
};
use chrono::NaiveDateTime;

fn hash_of<H: Hash>(value: &H) -> i32 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish() as i32
}

/// Two properties, equality, hash and a string conversion that agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExampleDto {
    pub name: String,
    pub count: i32,
}

impl fmt::Display for ExampleDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExampleDto[name={}, count={}]", self.name, self.count)
    }
}

impl DataObject for ExampleDto {
    const NAME: &'static str = "ExampleDto";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![String, i32], |args| {
                Ok(ExampleDto {
                    name: args.get(0)?,
                    count: args.get(1)?,
                })
            })
            .constructor(params![], |_| Ok(ExampleDto::default()))
            .property("name", |d: &ExampleDto| d.name.clone(), |d: &mut ExampleDto, v| d.name = v)
            .property("count", |d: &ExampleDto| d.count, |d: &mut ExampleDto, v| d.count = v)
            .partial_eq()
            .hashed()
            .display()
    }
}

/// Declares a hash but no equality.
#[derive(Debug, Clone, Hash)]
pub struct OnlyHash {
    pub id: i64,
}

impl DataObject for OnlyHash {
    const NAME: &'static str = "OnlyHash";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![i64], |_| panic!("must not be constructed"))
            .hashed()
    }
}

/// Declares equality but no hash.
#[derive(Debug, Clone, PartialEq)]
pub struct OnlyEquals {
    pub id: i64,
}

impl DataObject for OnlyEquals {
    const NAME: &'static str = "OnlyEquals";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![i64], |args| Ok(OnlyEquals { id: args.get(0)? }))
            .partial_eq()
    }
}

/// Equal to everything, null included.
#[derive(Debug, Clone)]
pub struct NullLover;

impl DataObject for NullLover {
    const NAME: &'static str = "NullLover";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![], |_| Ok(NullLover))
            .equals(|_, _| true)
            .hash_code(|_| 1)
    }
}

/// Not even equal to itself.
#[derive(Debug, Clone)]
pub struct Narcissist;

impl DataObject for Narcissist {
    const NAME: &'static str = "Narcissist";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![], |_| Ok(Narcissist))
            .equals(|_, _| false)
            .hash_code(|_| 1)
    }
}

/// Equal to every non-null value.
#[derive(Debug, Clone)]
pub struct Promiscuous;

impl DataObject for Promiscuous {
    const NAME: &'static str = "Promiscuous";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![], |_| Ok(Promiscuous))
            .equals_value(|_, other| Ok(!other.is_null()))
            .hash_code(|_| 0)
    }
}
data_object!(Promiscuous);

/// Holds a parameter object whose equality is broken.
#[derive(Debug, Clone)]
pub struct Holder {
    pub inner: Promiscuous,
}

impl DataObject for Holder {
    const NAME: &'static str = "Holder";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder.constructor(params![Promiscuous], |args| Ok(Holder { inner: args.get(0)? }))
    }
}

/// `set_name` writes a field called `label`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Misnamed {
    pub label: String,
}

impl DataObject for Misnamed {
    const NAME: &'static str = "Misnamed";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![String], |args| Ok(Misnamed { label: args.get(0)? }))
            .field("label", |m: &Misnamed| m.label.clone())
            .getter("label", |m: &Misnamed| m.label.clone())
            .setter("set_name", |m: &mut Misnamed, v: String| m.label = v)
            .partial_eq()
            .hashed()
    }
}

/// Can only be built from another `Node`.
#[derive(Debug, Clone)]
pub struct Node {
    pub next: Option<Box<Node>>,
}

impl DataObject for Node {
    const NAME: &'static str = "Node";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder.constructor(params![Node], |args| {
            Ok(Node {
                next: Some(Box::new(args.get(0)?)),
            })
        })
    }
}
data_object!(Node);

/// Self-referential, but with a way out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkedNode {
    pub label: String,
    pub next: Option<Box<LinkedNode>>,
}

impl DataObject for LinkedNode {
    const NAME: &'static str = "LinkedNode";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![LinkedNode], |args| {
                let next: LinkedNode = args.get(0)?;
                Ok(LinkedNode {
                    label: next.label.clone(),
                    next: Some(Box::new(next)),
                })
            })
            .constructor(params![String], |args| {
                Ok(LinkedNode {
                    label: args.get(0)?,
                    next: None,
                })
            })
            .property("label", |n: &LinkedNode| n.label.clone(), |n: &mut LinkedNode, v| n.label = v)
            .partial_eq()
            .hashed()
    }
}
data_object!(LinkedNode);

/// Base of an error hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Failure {
    pub message: String,
    pub code: i32,
}

impl DataObject for Failure {
    const NAME: &'static str = "Failure";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![String, i32], |args| {
                Ok(Failure {
                    message: args.get(0)?,
                    code: args.get(1)?,
                })
            })
            .property("message", |f: &Failure| f.message.clone(), |f: &mut Failure, v| f.message = v)
            .field_mut("code", |f: &Failure| f.code, |f: &mut Failure, v| f.code = v)
            .getter("code", |f: &Failure| f.code)
            .protected_setter("set_code", |f: &mut Failure, v: i32| f.code = v)
            .partial_eq()
            .hashed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timeout {
    pub base: Failure,
    pub seconds: u64,
}

fn failure_of(timeout: &Timeout) -> &Failure {
    &timeout.base
}

fn failure_of_mut(timeout: &mut Timeout) -> &mut Failure {
    &mut timeout.base
}

impl DataObject for Timeout {
    const NAME: &'static str = "Timeout";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .extends::<Failure>(failure_of, failure_of_mut)
            .constructor(params![String, u64], |args| {
                Ok(Timeout {
                    base: Failure {
                        message: args.get(0)?,
                        code: 408,
                    },
                    seconds: args.get(1)?,
                })
            })
            .property("seconds", |t: &Timeout| t.seconds, |t: &mut Timeout, v| t.seconds = v)
            .partial_eq()
            .hashed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Enumeration for Color {
    const NAME: &'static str = "Color";

    fn variants() -> Vec<Self> {
        vec![Color::Red, Color::Green, Color::Blue]
    }

    fn variant_name(&self) -> String {
        format!("{:?}", self)
    }
}
enumeration!(Color);

#[derive(Debug, Clone, PartialEq)]
pub enum Nothing {}

impl Enumeration for Nothing {
    const NAME: &'static str = "Nothing";

    fn variants() -> Vec<Self> {
        Vec::new()
    }

    fn variant_name(&self) -> String {
        match *self {}
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Palette {
    pub primary: Color,
}

impl DataObject for Palette {
    const NAME: &'static str = "Palette";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![Color], |args| Ok(Palette { primary: args.get(0)? }))
            .property("primary", |p: &Palette| p.primary, |p: &mut Palette, v| p.primary = v)
            .partial_eq()
            .hashed()
    }
}

/// Container, map, array and calendar members.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub items: Vec<String>,
    pub tags: HashSet<String>,
    pub prices: HashMap<String, i64>,
    pub codes: Box<[i32]>,
    pub created: NaiveDateTime,
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Catalog[items={:?}, tags={:?}, prices={:?}, codes={:?}, created={}]",
            self.items, self.tags, self.prices, self.codes, self.created
        )
    }
}

impl DataObject for Catalog {
    const NAME: &'static str = "Catalog";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(
                params![Vec<String>, HashSet<String>, HashMap<String, i64>, Box<[i32]>, NaiveDateTime],
                |args| {
                    Ok(Catalog {
                        items: args.get(0)?,
                        tags: args.get(1)?,
                        prices: args.get(2)?,
                        codes: args.get(3)?,
                        created: args.get(4)?,
                    })
                },
            )
            .property("items", |c: &Catalog| c.items.clone(), |c: &mut Catalog, v| c.items = v)
            .property("tags", |c: &Catalog| c.tags.clone(), |c: &mut Catalog, v| c.tags = v)
            .property("prices", |c: &Catalog| c.prices.clone(), |c: &mut Catalog, v| c.prices = v)
            .property("codes", |c: &Catalog| c.codes.clone(), |c: &mut Catalog, v| c.codes = v)
            .property("created", |c: &Catalog| c.created, |c: &mut Catalog, v| c.created = v)
            .display()
    }
}

#[derive(Debug, Clone)]
pub struct Triangle {
    pub sides: [f64; 3],
}

impl DataObject for Triangle {
    const NAME: &'static str = "Triangle";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .implements("Shape")
            .constructor(params![f64, f64, f64], |args| {
                Ok(Triangle {
                    sides: [args.get(0)?, args.get(1)?, args.get(2)?],
                })
            })
    }
}

/// Holds any `Shape`.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub shape: Instance,
}

impl DataObject for Canvas {
    const NAME: &'static str = "Canvas";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(vec![TypeRef::named("Shape")], |args| Ok(Canvas { shape: args.get(0)? }))
            .method("shape", params![], Some(TypeRef::named("Shape")), |c: &mut Canvas, _: &Args<'_>| {
                Ok(Value::Object(c.shape.clone()))
            })
    }
}

#[derive(Debug, Clone)]
pub struct Inner;

impl DataObject for Inner {
    const NAME: &'static str = "Inner";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder.constructor(params![], |_| Ok(Inner))
    }
}
data_object!(Inner);

/// Renders its inner object in the address-based default form.
#[derive(Debug, Clone)]
pub struct Labelled {
    pub label: String,
    pub inner: Instance,
}

impl DataObject for Labelled {
    const NAME: &'static str = "Labelled";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![String, Inner], |args| {
                Ok(Labelled {
                    label: args.get(0)?,
                    inner: args.get(1)?,
                })
            })
            .equals(|me: &Labelled, other: Option<&Labelled>| other.map_or(false, |o| o.label == me.label))
            .hash_code(|me: &Labelled| hash_of(&me.label))
            .to_text(|me: &Labelled| format!("Labelled[label={}, inner={}]", me.label, me.inner.default_text()))
    }
}

/// Only constructible through a hidden initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub id: i64,
}

impl DataObject for Token {
    const NAME: &'static str = "Token";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .hidden_constructor(params![i64], |args| Ok(Token { id: args.get(0)? }))
            .hidden_method("doubled", params![], Some(i64::type_ref()), |t: &mut Token, _: &Args<'_>| {
                Ok(Value::I64(t.id * 2))
            })
            .partial_eq()
            .hashed()
    }
}

/// Rejects anything that is not a German account number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iban {
    pub code: String,
}

pub const VALID_IBAN: &str = "DE89370400440532013000";

fn check_iban(code: &str) -> Result<(), Fault> {
    if code.starts_with("DE") && code.len() == 22 {
        Ok(())
    } else {
        Err(Fault::InvalidFormat(format!("{} is not an IBAN", code)))
    }
}

impl DataObject for Iban {
    const NAME: &'static str = "Iban";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![String], |args| {
                let code: String = args.get(0)?;
                check_iban(&code)?;
                Ok(Iban { code })
            })
            .field("code", |i: &Iban| i.code.clone())
            .getter("code", |i: &Iban| i.code.clone())
            .method("set_code", params![String], None, |i: &mut Iban, args: &Args<'_>| {
                let code: String = args.get(0)?;
                check_iban(&code)?;
                i.code = code;
                Ok(Value::Null)
            })
            .partial_eq()
            .hashed()
    }
}

/// Distinguishes an `i32` slot from an `Option<i32>` slot of equal arity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantity {
    pub amount: i32,
    pub boxed: bool,
}

impl DataObject for Quantity {
    const NAME: &'static str = "Quantity";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![i32], |args| {
                Ok(Quantity {
                    amount: args.get(0)?,
                    boxed: false,
                })
            })
            .constructor(params![Option<i32>], |args| {
                let amount: Option<i32> = args.get(0)?;
                Ok(Quantity {
                    amount: amount.unwrap_or_default(),
                    boxed: true,
                })
            })
            .field("amount", |q: &Quantity| q.amount)
            .partial_eq()
            .hashed()
    }
}

#[derive(Debug, Clone)]
pub struct Matrix {
    pub cells: Box<[Box<[i32]>]>,
}

impl DataObject for Matrix {
    const NAME: &'static str = "Matrix";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder.constructor(params![Box<[Box<[i32]>]>], |args| Ok(Matrix { cells: args.get(0)? }))
    }
}

/// Two-argument mutator and a misshapen string conversion.
#[derive(Debug, Clone)]
pub struct Range {
    pub lo: i32,
    pub hi: i32,
}

impl DataObject for Range {
    const NAME: &'static str = "Range";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![i32, i32], |args| {
                Ok(Range {
                    lo: args.get(0)?,
                    hi: args.get(1)?,
                })
            })
            .method("set_bounds", params![i32, i32], None, |r: &mut Range, args: &Args<'_>| {
                r.lo = args.get(0)?;
                r.hi = args.get(1)?;
                Ok(Value::Null)
            })
            .method("to_string", params![i32], Some(String::type_ref()), |r: &mut Range, args: &Args<'_>| {
                let width: i32 = args.get(0)?;
                Ok(Value::Text(format!("{:width$}..{}", r.lo, r.hi, width = width as usize)))
            })
    }
}

/// Its mutator drops the argument.
#[derive(Debug, Clone)]
pub struct Sticky {
    pub value: i32,
}

impl DataObject for Sticky {
    const NAME: &'static str = "Sticky";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![i32], |args| Ok(Sticky { value: args.get(0)? }))
            .field("value", |s: &Sticky| s.value)
            .getter("value", |s: &Sticky| s.value)
            .setter("set_value", |_: &mut Sticky, _: i32| {})
    }
}

/// Hashes a member that equality ignores.
#[derive(Debug, Clone)]
pub struct Counter {
    pub count: i32,
    pub hits: i32,
}

impl DataObject for Counter {
    const NAME: &'static str = "Counter";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![i32, i32], |args| {
                Ok(Counter {
                    count: args.get(0)?,
                    hits: args.get(1)?,
                })
            })
            .setter("set_hits", |c: &mut Counter, v: i32| c.hits = v)
            .equals(|me: &Counter, other: Option<&Counter>| other.map_or(false, |o| o.count == me.count))
            .hash_code(|me: &Counter| hash_of(&(me.count, me.hits)))
    }
}

/// Compares a member that the hash ignores.
#[derive(Debug, Clone, PartialEq)]
pub struct Sloppy {
    pub count: i32,
}

impl DataObject for Sloppy {
    const NAME: &'static str = "Sloppy";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![i32], |args| Ok(Sloppy { count: args.get(0)? }))
            .setter("set_count", |s: &mut Sloppy, v: i32| s.count = v)
            .partial_eq()
            .hash_code(|_| 7)
    }
}

/// No ordering declared.
#[derive(Debug, Clone)]
pub struct Loose;

impl DataObject for Loose {
    const NAME: &'static str = "Loose";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder.constructor(params![], |_| Ok(Loose))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rank {
    pub level: u8,
}

impl DataObject for Rank {
    const NAME: &'static str = "Rank";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![u8], |args| Ok(Rank { level: args.get(0)? }))
            .ordered()
    }
}

/// Only constructible through a protected initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Guarded {
    pub level: i32,
}

impl DataObject for Guarded {
    const NAME: &'static str = "Guarded";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .protected_constructor(params![i32], |args| Ok(Guarded { level: args.get(0)? }))
            .partial_eq()
            .hashed()
    }
}

thread_local! {
    static RECORDED: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

/// Notes passed to `Recorder`'s initializer on this thread since the last call.
pub fn take_recorded() -> Vec<String> {
    RECORDED.with(|notes| notes.borrow_mut().drain(..).collect())
}

/// Remembers every note it is constructed with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Recorder {
    pub note: String,
}

impl DataObject for Recorder {
    const NAME: &'static str = "Recorder";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![String], |args| {
                let note: String = args.get(0)?;
                RECORDED.with(|notes| notes.borrow_mut().push(note.clone()));
                Ok(Recorder { note })
            })
            .partial_eq()
            .hashed()
    }
}
data_object!(Recorder);

/// Takes objects as mutator arguments, one of them alongside a formatted tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Outer {
    pub name: String,
    pub rec: Recorder,
    pub tag: String,
}

impl DataObject for Outer {
    const NAME: &'static str = "Outer";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder
            .constructor(params![String], |args| {
                Ok(Outer {
                    name: args.get(0)?,
                    rec: Recorder::default(),
                    tag: String::new(),
                })
            })
            .field("name", |o: &Outer| o.name.clone())
            .getter("name", |o: &Outer| o.name.clone())
            .property("rec", |o: &Outer| o.rec.clone(), |o: &mut Outer, v| o.rec = v)
            .field("tag", |o: &Outer| o.tag.clone())
            .method("set_tagged", params![Recorder, String], None, |o: &mut Outer, args: &Args<'_>| {
                let tag: String = args.get(1)?;
                if !tag.starts_with("TAG-") {
                    return Err(Fault::InvalidFormat(format!("{} is not a tag", tag)));
                }
                o.rec = args.get(0)?;
                o.tag = tag;
                Ok(Value::Null)
            })
            .partial_eq()
            .hashed()
    }
}

/// Every fixture type, registered.
pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register::<ExampleDto>()
        .register::<OnlyHash>()
        .register::<OnlyEquals>()
        .register::<NullLover>()
        .register::<Narcissist>()
        .register::<Promiscuous>()
        .register::<Holder>()
        .register::<Misnamed>()
        .register::<Node>()
        .register::<LinkedNode>()
        .register::<Failure>()
        .register::<Timeout>()
        .register_enum::<Color>()
        .register_enum::<Nothing>()
        .register::<Palette>()
        .register::<Catalog>()
        .register_interface("Shape")
        .register::<Triangle>()
        .register::<Canvas>()
        .register::<Inner>()
        .register::<Labelled>()
        .register::<Token>()
        .register::<Iban>()
        .register::<Quantity>()
        .register::<Matrix>()
        .register::<Range>()
        .register::<Sticky>()
        .register::<Counter>()
        .register::<Sloppy>()
        .register::<Loose>()
        .register::<Rank>()
        .register::<Guarded>()
        .register::<Recorder>()
        .register::<Outer>();
    registry
}
