use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::method::{Method, MethodKind};
use crate::primitives;
use crate::value::Value;
use crate::{STRef, STWeakRef};

/// A reference that may be either weak or owned/strong.
#[derive(Debug, Clone)]
pub enum MaybeWeak<A> {
    /// An owned reference.
    Strong(STRef<A>),
    /// A weak reference.
    Weak(STWeakRef<A>),
}

/// Represents a loaded class.
///
/// Every class comes with its own metaclass (`Foo class`), which holds the class-side methods.
#[derive(Clone)]
pub struct Class {
    /// The class' name.
    pub name: String,
    /// The class of this class.
    pub class: MaybeWeak<Class>,
    /// The superclass of this class.
    pub super_class: Option<STRef<Class>>,
    /// The instance variables declared by this class (excluding inherited ones).
    pub locals: IndexMap<String, Value>,
    /// The class' methods/invokables.
    pub methods: IndexMap<String, Rc<Method>>,
}

impl Class {
    /// Create a class (and its metaclass) with the given instance variables.
    ///
    /// The superclass is left unset, see [`set_super_class`].
    pub fn new(name: impl Into<String>, instance_locals: &[String]) -> Result<STRef<Class>, String> {
        let name = name.into();
        let locals = {
            let mut locals = IndexMap::new();
            for field in instance_locals.iter() {
                if locals.insert(field.clone(), Value::Nil).is_some() {
                    return Err(format!(
                        "{}: the field named '{}' is already defined in this class",
                        name, field,
                    ));
                }
            }
            locals
        };

        let static_class = Rc::new(RefCell::new(Self {
            name: format!("{} class", name),
            class: MaybeWeak::Weak(Weak::new()),
            super_class: None,
            locals: IndexMap::new(),
            methods: IndexMap::new(),
        }));

        let instance_class = Rc::new(RefCell::new(Self {
            name,
            class: MaybeWeak::Strong(static_class),
            super_class: None,
            locals,
            methods: IndexMap::new(),
        }));

        Ok(instance_class)
    }

    /// Register the interpreter primitives known for this class, on both the instance and class side.
    pub fn install_primitives(class: &STRef<Class>) {
        let name = class.borrow().name().to_string();
        let static_class = class.borrow().class();

        let sides = [
            (class, primitives::get_instance_primitives(&name)),
            (&static_class, primitives::get_class_primitives(&name)),
        ];
        for (holder, primitives) in sides.iter() {
            let primitives = match primitives {
                Some(primitives) => primitives,
                None => continue,
            };
            for (signature, primitive) in primitives.iter() {
                let method = Method {
                    kind: MethodKind::Primitive(*primitive),
                    signature: signature.to_string(),
                    holder: Rc::downgrade(holder),
                };
                if holder.borrow_mut().define_method(method).is_some() {
                    tracing::warn!(
                        class = %holder.borrow().name(),
                        selector = %signature,
                        "primitive registered twice"
                    );
                }
            }
        }
    }

    /// Get the class' name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get the class of this class.
    pub fn class(&self) -> STRef<Self> {
        match self.class {
            MaybeWeak::Weak(ref weak) => weak.upgrade().unwrap_or_else(|| {
                panic!("metaclass dropped, cannot upgrade ref ({})", self.name())
            }),
            MaybeWeak::Strong(ref owned) => owned.clone(),
        }
    }

    /// Set the class of this class (as a weak reference).
    pub fn set_class(&mut self, class: &STRef<Self>) {
        self.class = MaybeWeak::Weak(Rc::downgrade(class));
    }

    /// Get the superclass of this class.
    pub fn super_class(&self) -> Option<STRef<Self>> {
        self.super_class.clone()
    }

    /// Set the superclass of this class.
    pub fn set_super_class(&mut self, class: &STRef<Self>) {
        self.super_class = Some(class.clone());
    }

    /// Search for a given method within this class, then within its superclasses.
    pub fn lookup_method(&self, signature: impl AsRef<str>) -> Option<Rc<Method>> {
        let signature = signature.as_ref();
        self.methods.get(signature).cloned().or_else(|| {
            self.super_class
                .as_ref()?
                .borrow()
                .lookup_method(signature)
        })
    }

    /// Add a method to this class, returning the method it replaces (if any).
    pub fn define_method(&mut self, method: Method) -> Option<Rc<Method>> {
        self.methods
            .insert(method.signature.clone(), Rc::new(method))
    }

    /// Get the names of every instance variable of this class, inherited ones first.
    pub fn all_locals(&self) -> Vec<String> {
        let mut fields = match self.super_class() {
            Some(super_class) => super_class.borrow().all_locals(),
            None => Vec::new(),
        };
        fields.extend(self.locals.keys().cloned());
        fields
    }
}

/// Set the superclass of a class, and of its metaclass accordingly.
///
/// The metaclass of a root class inherits from `class_class`.
pub fn set_super_class(
    class: &STRef<Class>,
    super_class: Option<&STRef<Class>>,
    class_class: &STRef<Class>,
    metaclass_class: &STRef<Class>,
) {
    let static_class = class.borrow().class();
    match super_class {
        Some(super_class) => {
            class.borrow_mut().set_super_class(super_class);
            static_class
                .borrow_mut()
                .set_super_class(&super_class.borrow().class());
        }
        None => static_class.borrow_mut().set_super_class(class_class),
    }
    static_class.borrow_mut().set_class(metaclass_class);
}

/// Is `class` the same class as `ancestor`, or one of its descendants ?
pub fn is_subclass_of(class: &STRef<Class>, ancestor: &STRef<Class>) -> bool {
    let mut current = Some(class.clone());
    while let Some(class) = current {
        if Rc::ptr_eq(&class, ancestor) {
            return true;
        }
        current = class.borrow().super_class();
    }
    false
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("locals", &self.locals.keys())
            .field("methods", &self.methods.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> (STRef<Class>, STRef<Class>, STRef<Class>) {
        let class_class = Class::new("Class", &[]).unwrap();
        let metaclass_class = Class::new("Metaclass", &[]).unwrap();
        let object = Class::new("Object", &[]).unwrap();
        set_super_class(&object, None, &class_class, &metaclass_class);
        let shape = Class::new("Shape", &["origin".to_string()]).unwrap();
        set_super_class(&shape, Some(&object), &class_class, &metaclass_class);
        let circle = Class::new("Circle", &["radius".to_string()]).unwrap();
        set_super_class(&circle, Some(&shape), &class_class, &metaclass_class);
        (object, shape, circle)
    }

    fn unary(holder: &STRef<Class>, signature: &str) -> Method {
        fn nothing(
            _: &mut crate::universe::Universe,
            _: Vec<Value>,
        ) -> crate::invokable::Return {
            crate::invokable::Return::Local(Value::Nil)
        }
        Method {
            kind: MethodKind::Primitive(nothing),
            signature: signature.to_string(),
            holder: Rc::downgrade(holder),
        }
    }

    #[test]
    fn lookup_walks_the_superclass_chain() {
        let (object, shape, circle) = hierarchy();
        let method = unary(&shape, "area");
        shape.borrow_mut().define_method(method);

        let found = circle.borrow().lookup_method("area").unwrap();
        assert!(Rc::ptr_eq(&found.holder().upgrade().unwrap(), &shape));
        assert!(object.borrow().lookup_method("area").is_none());
    }

    #[test]
    fn redefinition_replaces_the_previous_method() {
        let (_, shape, _) = hierarchy();
        assert!(shape.borrow_mut().define_method(unary(&shape, "area")).is_none());
        assert!(shape.borrow_mut().define_method(unary(&shape, "area")).is_some());
        assert_eq!(shape.borrow().methods.len(), 1);
    }

    #[test]
    fn subclass_relationship_is_reflexive_and_transitive() {
        let (object, shape, circle) = hierarchy();
        assert!(is_subclass_of(&circle, &circle));
        assert!(is_subclass_of(&circle, &object));
        assert!(!is_subclass_of(&shape, &circle));
    }

    #[test]
    fn metaclasses_mirror_the_class_chain() {
        let (_, shape, circle) = hierarchy();
        let circle_class = circle.borrow().class();
        let shape_class = shape.borrow().class();
        assert_eq!(circle_class.borrow().name(), "Circle class");
        assert!(Rc::ptr_eq(&circle_class.borrow().super_class().unwrap(), &shape_class));
    }

    #[test]
    fn locals_are_inherited_in_order() {
        let (_, _, circle) = hierarchy();
        assert_eq!(circle.borrow().all_locals(), vec!["origin", "radius"]);
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        let fields = ["x".to_string(), "x".to_string()];
        assert!(Class::new("Point", &fields).is_err());
    }
}
