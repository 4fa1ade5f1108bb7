//! Shared handles to constructed objects
//!
//! An `Instance` pairs a type-erased object with its descriptor. Every call
//! into code of the type under test goes through here and runs inside
//! [`guard`], so a panicking member is reported instead of unwinding through
//! the verifier.

use std::any::{type_name, Any};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::descriptor::{descriptor_of, DataObject, FieldDescriptor, MethodDescriptor, TypeDescriptor};
use crate::fault::{guard, Fault};
use crate::value::Value;

#[derive(Clone)]
pub struct Instance {
    descriptor: Rc<TypeDescriptor>,
    cell: Rc<RefCell<Box<dyn Any>>>,
}

impl Instance {
    pub fn new(descriptor: Rc<TypeDescriptor>, object: Box<dyn Any>) -> Instance {
        Instance {
            descriptor,
            cell: Rc::new(RefCell::new(object)),
        }
    }

    /// Wrap a registered Rust value.
    pub fn adopt<T: DataObject>(object: T) -> Instance {
        Instance::new(descriptor_of::<T>(), Box::new(object))
    }

    /// A bare object of no registered type, used to probe equality against a
    /// foreign value.
    pub fn unrelated() -> Instance {
        Instance::new(Rc::new(TypeDescriptor::opaque()), Box::new(()))
    }

    pub fn descriptor(&self) -> &Rc<TypeDescriptor> {
        &self.descriptor
    }

    pub fn type_name(&self) -> &str {
        self.descriptor.name()
    }

    /// Reference identity.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.cell) as *const u8 as usize
    }

    /// Clone the underlying Rust value out.
    pub fn get<T: Any + Clone>(&self) -> Result<T, Fault> {
        self.peek(|object: Option<&T>| object.cloned())?
            .ok_or_else(|| Fault::mismatch(type_name::<T>(), self.type_name()))
    }

    /// Run `f` on the underlying value if it is a `T`.
    pub fn peek<T: Any, R>(&self, f: impl FnOnce(Option<&T>) -> R) -> Result<R, Fault> {
        let object = self
            .cell
            .try_borrow()
            .map_err(|_| Fault::Other(format!("{} is being modified", self.type_name())))?;
        let any: &dyn Any = &**object;
        Ok(f(any.downcast_ref::<T>()))
    }

    /// Declared equality, or reference identity when none is declared.
    pub fn equals(&self, other: &Value) -> Result<bool, Fault> {
        match &self.descriptor.equality {
            Some(equality) => self.with_object(|object| equality(object, other)),
            None => Ok(match other {
                Value::Object(o) => self.ptr_eq(o),
                _ => false,
            }),
        }
    }

    /// Declared hash, or an identity hash when none is declared.
    pub fn hash_code(&self) -> Result<i32, Fault> {
        match &self.descriptor.hash {
            Some(hash) => self.with_object(|object| hash(object)),
            None => Ok(self.address() as i32),
        }
    }

    /// Declared string conversion, or the address-based default form.
    pub fn to_text(&self) -> Result<String, Fault> {
        match &self.descriptor.text {
            Some(text) => self.with_object(|object| text(object)),
            None => Ok(self.default_text()),
        }
    }

    /// `Name@address`, the form objects without a string conversion take.
    pub fn default_text(&self) -> String {
        format!("{}@{:x}", self.type_name(), self.address())
    }

    pub fn read_field(&self, field: &FieldDescriptor) -> Result<Value, Fault> {
        self.with_object(|object| (field.read)(object))
    }

    pub fn write_field(&self, field: &FieldDescriptor, value: &Value) -> Result<(), Fault> {
        match &field.write {
            Some(write) => self.with_object_mut(|object| write(object, value)),
            None => Err(Fault::IllegalArgument(format!(
                "field {} of {} is read-only",
                field.name,
                self.type_name()
            ))),
        }
    }

    pub fn invoke(&self, method: &MethodDescriptor, args: &[Value]) -> Result<Value, Fault> {
        self.with_object_mut(|object| (method.body)(object, args))
    }

    /// An independent copy with the same contents.
    pub fn duplicate(&self) -> Result<Instance, Fault> {
        let clone = self
            .descriptor
            .duplicate
            .as_ref()
            .ok_or_else(|| Fault::Other(format!("{} cannot be copied", self.type_name())))?;
        let copy = self.with_object(|object| clone(object))?;
        Ok(Instance::new(self.descriptor.clone(), copy))
    }

    fn with_object<R>(&self, f: impl FnOnce(&dyn Any) -> Result<R, Fault>) -> Result<R, Fault> {
        guard(|| {
            let object = self
                .cell
                .try_borrow()
                .map_err(|_| Fault::Other(format!("{} is being modified", self.type_name())))?;
            f(&**object)
        })
    }

    fn with_object_mut<R>(&self, f: impl FnOnce(&mut dyn Any) -> Result<R, Fault>) -> Result<R, Fault> {
        guard(|| {
            let mut object = self
                .cell
                .try_borrow_mut()
                .map_err(|_| Fault::Other(format!("{} is already borrowed", self.type_name())))?;
            f(&mut **object)
        })
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_text())
    }
}
