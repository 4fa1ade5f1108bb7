//! Typed construction of [`TypeDescriptor`]s.

use std::any::{type_name, Any};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::rc::Rc;

use super::{
    descriptor_of, CloneFn, DataObject, EqualsFn, FieldDescriptor, HashFn, InitFn, Initializer, MethodDescriptor,
    MethodFn, ReadFn, TextFn, TypeDescriptor, TypeKind, Visibility, WriteFn,
};
use crate::fault::Fault;
use crate::reflect::{FromValue, IntoValue, Reflect};
use crate::types::TypeRef;
use crate::value::Value;

fn this<T: Any>(any: &dyn Any) -> Result<&T, Fault> {
    any.downcast_ref::<T>()
        .ok_or_else(|| Fault::mismatch(type_name::<T>(), "a value of another type"))
}

fn this_mut<T: Any>(any: &mut dyn Any) -> Result<&mut T, Fault> {
    any.downcast_mut::<T>()
        .ok_or_else(|| Fault::mismatch(type_name::<T>(), "a value of another type"))
}

fn check_arity(member: &str, expected: usize, values: &[Value]) -> Result<(), Fault> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(Fault::IllegalArgument(format!(
            "{} takes {} argument(s) but {} were supplied",
            member,
            expected,
            values.len()
        )))
    }
}

/// Positional arguments handed to an initializer or method body.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Args { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw value at a 0-based position.
    pub fn value(&self, index: usize) -> Result<&'a Value, Fault> {
        self.values
            .get(index)
            .ok_or_else(|| Fault::IllegalArgument(format!("no argument at position {}", index)))
    }

    /// The argument at a 0-based position, converted to `F`.
    pub fn get<F: FromValue>(&self, index: usize) -> Result<F, Fault> {
        F::from_value(self.value(index)?)
    }
}

/// Builder handed to [`DataObject::describe`].
pub struct TypeBuilder<T> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DataObject> Default for TypeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DataObject> TypeBuilder<T> {
    pub fn new() -> Self {
        let mut descriptor = TypeDescriptor::bare(T::NAME, TypeKind::Concrete);
        let duplicate: CloneFn = Rc::new(|any: &dyn Any| Ok(Box::new(this::<T>(any)?.clone()) as Box<dyn Any>));
        descriptor.duplicate = Some(duplicate);
        TypeBuilder {
            descriptor,
            _marker: PhantomData,
        }
    }

    /// Mark the type abstract: it is verified only through implementations.
    pub fn abstract_type(mut self) -> Self {
        self.descriptor.kind = TypeKind::Abstract;
        self
    }

    pub fn constructor<F>(self, params: Vec<TypeRef>, body: F) -> Self
    where
        F: Fn(&Args<'_>) -> Result<T, Fault> + 'static,
    {
        self.initializer(Visibility::Public, params, body)
    }

    pub fn protected_constructor<F>(self, params: Vec<TypeRef>, body: F) -> Self
    where
        F: Fn(&Args<'_>) -> Result<T, Fault> + 'static,
    {
        self.initializer(Visibility::Protected, params, body)
    }

    pub fn hidden_constructor<F>(self, params: Vec<TypeRef>, body: F) -> Self
    where
        F: Fn(&Args<'_>) -> Result<T, Fault> + 'static,
    {
        self.initializer(Visibility::Hidden, params, body)
    }

    pub fn initializer<F>(mut self, visibility: Visibility, params: Vec<TypeRef>, body: F) -> Self
    where
        F: Fn(&Args<'_>) -> Result<T, Fault> + 'static,
    {
        let arity = params.len();
        let init: InitFn = Rc::new(move |values: &[Value]| {
            check_arity(T::NAME, arity, values)?;
            body(&Args::new(values)).map(|built| Box::new(built) as Box<dyn Any>)
        });
        self.descriptor.initializers.push(Initializer {
            params,
            visibility,
            body: init,
        });
        self
    }

    /// A read-only field.
    pub fn field<F, R>(self, name: &str, read: R) -> Self
    where
        F: IntoValue + Reflect,
        R: Fn(&T) -> F + 'static,
    {
        let read_fn: ReadFn = Rc::new(move |any: &dyn Any| Ok(read(this::<T>(any)?).into_value()));
        self.push_field(name, F::type_ref(), read_fn, None)
    }

    /// A field that can also be overwritten, which lets run-dependent members
    /// be blanked before string comparison.
    pub fn field_mut<F, R, W>(self, name: &str, read: R, write: W) -> Self
    where
        F: IntoValue + FromValue + Reflect,
        R: Fn(&T) -> F + 'static,
        W: Fn(&mut T, F) + 'static,
    {
        let read_fn: ReadFn = Rc::new(move |any: &dyn Any| Ok(read(this::<T>(any)?).into_value()));
        let write_fn: WriteFn = Rc::new(move |any: &mut dyn Any, value: &Value| {
            let converted = F::from_value(value)?;
            write(this_mut::<T>(any)?, converted);
            Ok(())
        });
        self.push_field(name, F::type_ref(), read_fn, Some(write_fn))
    }

    fn push_field(mut self, name: &str, ty: TypeRef, read: ReadFn, write: Option<WriteFn>) -> Self {
        self.descriptor.fields.push(FieldDescriptor {
            name: name.to_string(),
            ty,
            declared_by: T::NAME.to_string(),
            read,
            write,
        });
        self
    }

    pub fn method<M>(self, name: &str, params: Vec<TypeRef>, returns: Option<TypeRef>, body: M) -> Self
    where
        M: Fn(&mut T, &Args<'_>) -> Result<Value, Fault> + 'static,
    {
        self.push_method(name, Visibility::Public, params, returns, body)
    }

    pub fn protected_method<M>(self, name: &str, params: Vec<TypeRef>, returns: Option<TypeRef>, body: M) -> Self
    where
        M: Fn(&mut T, &Args<'_>) -> Result<Value, Fault> + 'static,
    {
        self.push_method(name, Visibility::Protected, params, returns, body)
    }

    pub fn hidden_method<M>(self, name: &str, params: Vec<TypeRef>, returns: Option<TypeRef>, body: M) -> Self
    where
        M: Fn(&mut T, &Args<'_>) -> Result<Value, Fault> + 'static,
    {
        self.push_method(name, Visibility::Hidden, params, returns, body)
    }

    fn push_method<M>(
        mut self,
        name: &str,
        visibility: Visibility,
        params: Vec<TypeRef>,
        returns: Option<TypeRef>,
        body: M,
    ) -> Self
    where
        M: Fn(&mut T, &Args<'_>) -> Result<Value, Fault> + 'static,
    {
        let arity = params.len();
        let member = format!("{}::{}", T::NAME, name);
        let method: MethodFn = Rc::new(move |any: &mut dyn Any, values: &[Value]| {
            check_arity(&member, arity, values)?;
            body(this_mut::<T>(any)?, &Args::new(values))
        });
        self.descriptor.methods.push(MethodDescriptor {
            name: name.to_string(),
            params,
            returns,
            visibility,
            declared_by: T::NAME.to_string(),
            body: method,
        });
        self
    }

    /// A public no-argument accessor.
    pub fn getter<F, G>(self, name: &str, get: G) -> Self
    where
        F: IntoValue + Reflect,
        G: Fn(&T) -> F + 'static,
    {
        self.try_getter(name, move |t: &T| Ok(get(t)))
    }

    /// An accessor that can fail, for members backed by collaborator state.
    pub fn try_getter<F, G>(self, name: &str, get: G) -> Self
    where
        F: IntoValue + Reflect,
        G: Fn(&T) -> Result<F, Fault> + 'static,
    {
        self.method(name, Vec::new(), Some(F::type_ref()), move |t: &mut T, _: &Args<'_>| {
            get(&*t).map(IntoValue::into_value)
        })
    }

    /// A public single-argument mutator.
    pub fn setter<F, S>(self, name: &str, set: S) -> Self
    where
        F: FromValue + Reflect,
        S: Fn(&mut T, F) + 'static,
    {
        self.method(name, vec![F::type_ref()], None, move |t: &mut T, args: &Args<'_>| {
            set(t, args.get(0)?);
            Ok(Value::Null)
        })
    }

    pub fn protected_setter<F, S>(self, name: &str, set: S) -> Self
    where
        F: FromValue + Reflect,
        S: Fn(&mut T, F) + 'static,
    {
        self.protected_method(name, vec![F::type_ref()], None, move |t: &mut T, args: &Args<'_>| {
            set(t, args.get(0)?);
            Ok(Value::Null)
        })
    }

    /// A field named `name`, an accessor `name()` and a mutator `set_name`.
    pub fn property<F, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        F: IntoValue + FromValue + Reflect,
        G: Fn(&T) -> F + 'static,
        S: Fn(&mut T, F) + 'static,
    {
        let get = Rc::new(get);
        let set = Rc::new(set);
        let (read, accessor) = (get.clone(), get);
        let write = set.clone();
        self.field_mut(name, move |t: &T| read(t), move |t: &mut T, v: F| write(t, v))
            .getter(name, move |t: &T| accessor(t))
            .setter(&format!("set_{}", name), move |t: &mut T, v: F| set(t, v))
    }

    /// Declared equality. The second argument is `None` when the other value
    /// is null or of another type.
    pub fn equals<E>(mut self, eq: E) -> Self
    where
        E: Fn(&T, Option<&T>) -> bool + 'static,
    {
        let equality: EqualsFn = Rc::new(move |any: &dyn Any, other: &Value| {
            let me = this::<T>(any)?;
            match other {
                Value::Object(instance) => instance.peek(|candidate: Option<&T>| eq(me, candidate)),
                _ => Ok(eq(me, None)),
            }
        });
        self.descriptor.equality = Some(equality);
        self
    }

    /// Declared equality over raw values, for predicates that inspect
    /// non-object arguments.
    pub fn equals_value<E>(mut self, eq: E) -> Self
    where
        E: Fn(&T, &Value) -> Result<bool, Fault> + 'static,
    {
        let equality: EqualsFn = Rc::new(move |any: &dyn Any, other: &Value| eq(this::<T>(any)?, other));
        self.descriptor.equality = Some(equality);
        self
    }

    /// Declared equality from `PartialEq`.
    pub fn partial_eq(self) -> Self
    where
        T: PartialEq,
    {
        self.equals(|me: &T, other: Option<&T>| other.map_or(false, |other| me == other))
    }

    pub fn hash_code<H>(mut self, hash: H) -> Self
    where
        H: Fn(&T) -> i32 + 'static,
    {
        let hash_fn: HashFn = Rc::new(move |any: &dyn Any| Ok(hash(this::<T>(any)?)));
        self.descriptor.hash = Some(hash_fn);
        self
    }

    /// Declared hash from `Hash`, truncated to 32 bits.
    pub fn hashed(self) -> Self
    where
        T: Hash,
    {
        self.hash_code(|me: &T| {
            let mut hasher = DefaultHasher::new();
            me.hash(&mut hasher);
            hasher.finish() as i32
        })
    }

    /// Declared string conversion.
    pub fn to_text<S>(self, text: S) -> Self
    where
        S: Fn(&T) -> String + 'static,
    {
        self.try_to_text(move |me: &T| Ok(text(me)))
    }

    pub fn try_to_text<S>(mut self, text: S) -> Self
    where
        S: Fn(&T) -> Result<String, Fault> + 'static,
    {
        let text_fn: TextFn = Rc::new(move |any: &dyn Any| text(this::<T>(any)?));
        self.descriptor.text = Some(text_fn);
        self
    }

    /// Declared string conversion from `Display`.
    pub fn display(self) -> Self
    where
        T: Display,
    {
        self.to_text(|me: &T| me.to_string())
    }

    /// Instances support a three-way comparison.
    pub fn ordered(mut self) -> Self
    where
        T: Ord,
    {
        self.descriptor.ordered = true;
        self
    }

    /// Declare an implemented interface.
    pub fn implements(mut self, interface: &str) -> Self {
        self.descriptor.supertypes.push(interface.to_string());
        self
    }

    /// Inherit the fields and methods of `B`, reached through `project`.
    ///
    /// Equality, hash and string conversion are not inherited; a subtype that
    /// wants them declares its own.
    pub fn extends<B: DataObject>(mut self, project: fn(&T) -> &B, project_mut: fn(&mut T) -> &mut B) -> Self {
        let base = descriptor_of::<B>();
        self.descriptor.supertypes.push(B::NAME.to_string());
        self.descriptor.supertypes.extend(base.supertypes.iter().cloned());

        for field in base.fields.iter() {
            let base_read = field.read.clone();
            let read: ReadFn = Rc::new(move |any: &dyn Any| base_read(project(this::<T>(any)?) as &dyn Any));
            let write = field.write.clone().map(|base_write| {
                let write: WriteFn =
                    Rc::new(move |any: &mut dyn Any, value: &Value| base_write(project_mut(this_mut::<T>(any)?) as &mut dyn Any, value));
                write
            });
            self.descriptor.fields.push(FieldDescriptor {
                name: field.name.clone(),
                ty: field.ty.clone(),
                declared_by: field.declared_by.clone(),
                read,
                write,
            });
        }

        for method in base.methods.iter() {
            let base_body = method.body.clone();
            let body: MethodFn =
                Rc::new(move |any: &mut dyn Any, values: &[Value]| base_body(project_mut(this_mut::<T>(any)?) as &mut dyn Any, values));
            self.descriptor.methods.push(MethodDescriptor {
                name: method.name.clone(),
                params: method.params.clone(),
                returns: method.returns.clone(),
                visibility: method.visibility,
                declared_by: method.declared_by.clone(),
                body,
            });
        }
        self
    }

    pub fn build(self) -> TypeDescriptor {
        let mut descriptor = self.descriptor;
        let own = descriptor.name.clone();

        // Own members shadow inherited ones.
        descriptor.fields.sort_by_key(|f| f.declared_by != own);
        descriptor.methods.sort_by_key(|m| m.declared_by != own);
        let mut seen = HashSet::new();
        descriptor
            .methods
            .retain(|m| seen.insert((m.name.clone(), m.params.clone())));
        descriptor
    }
}
