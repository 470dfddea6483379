use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, bail, Error};

use st_core::ast;

use crate::class::{self, Class};
use crate::config::{Policy, Strictness};
use crate::environment::Environment;
use crate::evaluate::Evaluate;
use crate::exception::{Exception, NotUnderstood, UncaughtCondition};
use crate::invokable::{Invoke, Return};
use crate::method::{signature_arity, Method};
use crate::value::Value;
use crate::STRef;

/// The core classes of the interpreter.
///
/// This struct allows to always keep a reference to important classes,
/// even in case of modifications to global bindings by user-defined code.
#[derive(Debug)]
pub struct CoreClasses {
    /// The **Object** class.
    pub object_class: STRef<Class>,
    /// The **Class** class.
    pub class_class: STRef<Class>,
    /// The **Metaclass** class.
    pub metaclass_class: STRef<Class>,

    /// The **UndefinedObject** class.
    pub nil_class: STRef<Class>,
    /// The **Boolean** class.
    pub boolean_class: STRef<Class>,
    /// The **True** class.
    pub true_class: STRef<Class>,
    /// The **False** class.
    pub false_class: STRef<Class>,
    /// The **Integer** class.
    pub integer_class: STRef<Class>,
    /// The **String** class.
    pub string_class: STRef<Class>,
    /// The **Symbol** class.
    pub symbol_class: STRef<Class>,
    /// The **Array** class.
    pub array_class: STRef<Class>,
    /// The **Block** class.
    pub block_class: STRef<Class>,

    /// The **Exception** class.
    pub exception_class: STRef<Class>,
    /// The **Error** class.
    pub error_class: STRef<Class>,
    /// The **ZeroDivide** class.
    pub zero_divide_class: STRef<Class>,
    /// The **MessageNotUnderstood** class.
    pub message_not_understood_class: STRef<Class>,
    /// The **NotFound** class.
    pub not_found_class: STRef<Class>,
    /// The **UnboundVariable** class.
    pub unbound_variable_class: STRef<Class>,
    /// The **PrimitiveFailed** class.
    pub primitive_failed_class: STRef<Class>,
    /// The **WrongArgumentCount** class.
    pub wrong_argument_count_class: STRef<Class>,
    /// The **ExceptionSet** class.
    pub exception_set_class: STRef<Class>,
}

/// The central data structure for the interpreter.
///
/// It represents the complete state of the interpreter, like the known class definitions,
/// the global scope and the stack of active environments.
pub struct Universe {
    /// The root environment, holding the global bindings.
    pub globals: STRef<Environment>,
    /// The stack of active environments (one per method or block activation).
    pub frames: Vec<STRef<Environment>>,
    /// The interpreter's core classes.
    pub core: CoreClasses,
    /// How lenient the evaluation is.
    pub strictness: Strictness,
}

impl Universe {
    /// Initialize a universe with the default strictness settings.
    pub fn new() -> Result<Self, Error> {
        Self::with_strictness(Strictness::default())
    }

    /// Initialize a universe with the given strictness settings.
    pub fn with_strictness(strictness: Strictness) -> Result<Self, Error> {
        let object_class = Self::load_system_class("Object")?;
        let class_class = Self::load_system_class("Class")?;
        let metaclass_class = Self::load_system_class("Metaclass")?;

        let nil_class = Self::load_system_class("UndefinedObject")?;
        let boolean_class = Self::load_system_class("Boolean")?;
        let true_class = Self::load_system_class("True")?;
        let false_class = Self::load_system_class("False")?;
        let integer_class = Self::load_system_class("Integer")?;
        let string_class = Self::load_system_class("String")?;
        let symbol_class = Self::load_system_class("Symbol")?;
        let array_class = Self::load_system_class("Array")?;
        let block_class = Self::load_system_class("Block")?;

        let exception_class = Self::load_system_class("Exception")?;
        let error_class = Self::load_system_class("Error")?;
        let zero_divide_class = Self::load_system_class("ZeroDivide")?;
        let message_not_understood_class = Self::load_system_class("MessageNotUnderstood")?;
        let not_found_class = Self::load_system_class("NotFound")?;
        let unbound_variable_class = Self::load_system_class("UnboundVariable")?;
        let primitive_failed_class = Self::load_system_class("PrimitiveFailed")?;
        let wrong_argument_count_class = Self::load_system_class("WrongArgumentCount")?;
        let exception_set_class = Self::load_system_class("ExceptionSet")?;

        let hierarchy: &[(&STRef<Class>, Option<&STRef<Class>>)] = &[
            (&object_class, None),
            (&class_class, Some(&object_class)),
            (&metaclass_class, Some(&class_class)),
            (&nil_class, Some(&object_class)),
            (&boolean_class, Some(&object_class)),
            (&true_class, Some(&boolean_class)),
            (&false_class, Some(&boolean_class)),
            (&integer_class, Some(&object_class)),
            (&string_class, Some(&object_class)),
            (&symbol_class, Some(&string_class)),
            (&array_class, Some(&object_class)),
            (&block_class, Some(&object_class)),
            (&exception_class, Some(&object_class)),
            (&error_class, Some(&exception_class)),
            (&zero_divide_class, Some(&error_class)),
            (&message_not_understood_class, Some(&error_class)),
            (&not_found_class, Some(&exception_class)),
            (&unbound_variable_class, Some(&error_class)),
            (&primitive_failed_class, Some(&error_class)),
            (&wrong_argument_count_class, Some(&error_class)),
            (&exception_set_class, Some(&object_class)),
        ];

        let globals = Environment::root().into_ref();
        for (class, super_class) in hierarchy.iter() {
            class::set_super_class(class, *super_class, &class_class, &metaclass_class);
            Class::install_primitives(class);
            let name = class.borrow().name().to_string();
            globals.borrow_mut().define(name, Value::Class(Rc::clone(class)));
        }

        globals.borrow_mut().define("true", Value::Boolean(true));
        globals.borrow_mut().define("false", Value::Boolean(false));
        globals.borrow_mut().define("nil", Value::Nil);

        Ok(Self {
            globals,
            frames: Vec::new(),
            strictness,
            core: CoreClasses {
                object_class,
                class_class,
                metaclass_class,
                nil_class,
                boolean_class,
                true_class,
                false_class,
                integer_class,
                string_class,
                symbol_class,
                array_class,
                block_class,
                exception_class,
                error_class,
                zero_divide_class,
                message_not_understood_class,
                not_found_class,
                unbound_variable_class,
                primitive_failed_class,
                wrong_argument_count_class,
                exception_set_class,
            },
        })
    }

    /// Create one of the built-in classes (its superclass is wired up by the caller).
    pub fn load_system_class(class_name: &str) -> Result<STRef<Class>, Error> {
        Class::new(class_name, &[])
            .map_err(|err| anyhow!("could not create the '{}' system class: {}", class_name, err))
    }

    /// Create a new class and bind it globally.
    pub fn create_class(
        &mut self,
        class_name: &str,
        super_class: &STRef<Class>,
        instance_locals: &[String],
    ) -> Result<STRef<Class>, Error> {
        if let Some(field) = instance_locals
            .iter()
            .find(|field| super_class.borrow().all_locals().contains(field))
        {
            bail!(
                "{}: the field named '{}' is already defined in a superclass",
                class_name,
                field
            );
        }
        let class = Class::new(class_name, instance_locals).map_err(Error::msg)?;
        class::set_super_class(
            &class,
            Some(super_class),
            &self.core.class_class,
            &self.core.metaclass_class,
        );
        tracing::debug!(class = %class_name, super_class = %super_class.borrow().name(), "class created");
        self.globals
            .borrow_mut()
            .define(class_name, Value::Class(class.clone()));
        Ok(class)
    }

    /// Add a method, whose body is evaluated against the global scope, to the given class.
    pub fn define_method(
        &mut self,
        holder: &STRef<Class>,
        signature: &str,
        parameters: &[&str],
        body: Vec<ast::Expression>,
    ) -> Result<(), Error> {
        let block = ast::Block {
            parameters: parameters.iter().map(|it| it.to_string()).collect(),
            locals: Vec::new(),
            body: ast::Body::new(body),
        };
        let environment = self.globals.clone();
        self.define_method_from_block(holder, signature, Rc::new(block), environment)
    }

    /// Add a method to the given class, from a block definition and the environment it closes over.
    pub fn define_method_from_block(
        &mut self,
        holder: &STRef<Class>,
        signature: &str,
        block: Rc<ast::Block>,
        environment: STRef<Environment>,
    ) -> Result<(), Error> {
        let expected = signature_arity(signature);
        if block.parameters.len() != expected {
            bail!(
                "'{}' expects {} parameter(s), but the definition declares {}",
                signature,
                expected,
                block.parameters.len()
            );
        }
        let method = Method::defined(holder, signature, block, environment);
        if holder.borrow_mut().define_method(method).is_some() {
            tracing::debug!(class = %holder.borrow().name(), selector = %signature, "method redefined");
        }
        Ok(())
    }

    /// Evaluate a program (a statement sequence) within the global scope.
    pub fn evaluate(&mut self, body: &ast::Body) -> Result<Value, UncaughtCondition> {
        let globals = self.globals.clone();
        let output = self.with_frame(globals, |universe| body.evaluate(universe));
        Self::into_result(output)
    }

    /// Evaluate a single expression within the global scope.
    pub fn evaluate_expression(
        &mut self,
        expr: &ast::Expression,
    ) -> Result<Value, UncaughtCondition> {
        let globals = self.globals.clone();
        let output = self.with_frame(globals, |universe| expr.evaluate(universe));
        Self::into_result(output)
    }

    fn into_result(output: Return) -> Result<Value, UncaughtCondition> {
        match output {
            Return::Local(value) => Ok(value),
            Return::Signal(exception) => {
                let condition = UncaughtCondition::from(&*exception.borrow());
                tracing::debug!(class = %condition.class_name, "uncaught condition");
                Err(condition)
            }
        }
    }

    /// Send a message to the given receiver.
    pub fn send(&mut self, receiver: Value, signature: &str, args: Vec<Value>) -> Return {
        let method = receiver.lookup_method(self, signature);
        self.dispatch(method, receiver, signature, args)
    }

    /// Invoke the method found by a lookup, or fall back to `doesNotUnderstand:`.
    pub fn dispatch(
        &mut self,
        method: Option<Rc<Method>>,
        receiver: Value,
        signature: &str,
        args: Vec<Value>,
    ) -> Return {
        match method {
            Some(method) => {
                let mut full_args = Vec::with_capacity(args.len() + 1);
                full_args.push(receiver);
                full_args.extend(args);
                method.invoke(self, full_args)
            }
            None => self.does_not_understand(receiver, signature, args),
        }
    }

    /// Call `doesNotUnderstand:` on the given value with a fresh does-not-understand condition.
    ///
    /// The default implementation (on **Object**) signals that condition.
    pub fn does_not_understand(
        &mut self,
        receiver: Value,
        signature: &str,
        args: Vec<Value>,
    ) -> Return {
        let class = receiver.class(self);
        tracing::debug!(
            receiver = %class.borrow().name(),
            selector = %signature,
            "message not understood"
        );

        let mut exception = Exception::with_message(
            self.core.message_not_understood_class.clone(),
            format!("Message not understood: {}", signature),
        );
        exception.not_understood = Some(NotUnderstood {
            receiver: receiver.clone(),
            selector: signature.to_string(),
            arguments: args,
        });
        let exception = Rc::new(RefCell::new(exception));

        match receiver.lookup_method(self, "doesNotUnderstand:") {
            Some(method) => method.invoke(self, vec![receiver, Value::Exception(exception)]),
            None => self.signal(exception),
        }
    }

    /// Start unwinding with the given condition.
    pub fn signal(&self, exception: STRef<Exception>) -> Return {
        tracing::debug!(
            class = %exception.borrow().class().borrow().name(),
            message = %exception.borrow().description(),
            "signal"
        );
        Return::Signal(exception)
    }

    /// Signal a fresh condition of the given class.
    pub fn signal_new(&self, class: STRef<Class>, message: impl Into<String>) -> Return {
        let exception = Exception::with_message(class, message);
        self.signal(Rc::new(RefCell::new(exception)))
    }

    /// Signal a `PrimitiveFailed` condition.
    pub fn primitive_failed(&self, message: impl Into<String>) -> Return {
        self.signal_new(self.core.primitive_failed_class.clone(), message)
    }

    /// Signal a `ZeroDivide` condition.
    pub fn zero_divide(&self) -> Return {
        self.signal_new(self.core.zero_divide_class.clone(), "Division by zero")
    }

    /// Signal an `UnboundVariable` condition.
    pub fn unbound_variable(&self, name: &str) -> Return {
        self.signal_new(
            self.core.unbound_variable_class.clone(),
            format!("Variable not found: {}", name),
        )
    }

    /// Signal a `WrongArgumentCount` condition.
    pub fn wrong_argument_count(&self, expected: usize, given: usize) -> Return {
        self.signal_new(
            self.core.wrong_argument_count_class.clone(),
            format!("wrong number of arguments: expected {}, got {}", expected, given),
        )
    }

    /// Evaluate `value` the way a conditional branch does: blocks are invoked, other objects are sent `value`.
    pub fn value_of(&mut self, value: Value) -> Return {
        match value {
            Value::Block(block) => block.invoke(self, Vec::new()),
            value => self.send(value, "value", Vec::new()),
        }
    }

    /// Run the given closure with a new environment pushed onto the stack of active environments.
    pub fn with_frame<T>(
        &mut self,
        frame: STRef<Environment>,
        func: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.frames.push(frame);
        let ret = func(self);
        self.frames.pop();
        ret
    }

    /// Get the current environment.
    pub fn current_frame(&self) -> STRef<Environment> {
        self.frames
            .last()
            .cloned()
            .unwrap_or_else(|| self.globals.clone())
    }

    /// Search for a binding, from the current environment up to the global scope.
    pub fn lookup_local(&self, name: impl AsRef<str>) -> Option<Value> {
        self.current_frame().borrow().lookup_local(name)
    }

    /// Assign to a binding, from the current environment up to the global scope.
    ///
    /// Unbound names get defined in the current environment, unless strictness forbids it.
    pub fn assign_local(&mut self, name: &str, value: Value) -> Return {
        let frame = self.current_frame();
        let assigned = frame.borrow_mut().assign_local(name, value.clone());
        match (assigned, self.strictness.undeclared_assignment) {
            (Some(()), _) => Return::Local(value),
            (None, Policy::Lenient) => {
                frame.borrow_mut().define(name, value.clone());
                Return::Local(value)
            }
            (None, Policy::Strict) => self.unbound_variable(name),
        }
    }

    /// Search for a global binding.
    pub fn lookup_global(&self, name: impl AsRef<str>) -> Option<Value> {
        self.globals.borrow().lookup_local(name)
    }

    /// Bind a name in the global scope.
    pub fn assign_global(&mut self, name: impl Into<String>, value: Value) {
        self.globals.borrow_mut().define(name, value);
    }

    /// Get the **UndefinedObject** class.
    pub fn nil_class(&self) -> STRef<Class> {
        self.core.nil_class.clone()
    }
    /// Get the **Object** class.
    pub fn object_class(&self) -> STRef<Class> {
        self.core.object_class.clone()
    }
    /// Get the **True** class.
    pub fn true_class(&self) -> STRef<Class> {
        self.core.true_class.clone()
    }
    /// Get the **False** class.
    pub fn false_class(&self) -> STRef<Class> {
        self.core.false_class.clone()
    }
    /// Get the **Integer** class.
    pub fn integer_class(&self) -> STRef<Class> {
        self.core.integer_class.clone()
    }
    /// Get the **String** class.
    pub fn string_class(&self) -> STRef<Class> {
        self.core.string_class.clone()
    }
    /// Get the **Symbol** class.
    pub fn symbol_class(&self) -> STRef<Class> {
        self.core.symbol_class.clone()
    }
    /// Get the **Array** class.
    pub fn array_class(&self) -> STRef<Class> {
        self.core.array_class.clone()
    }
    /// Get the **Block** class.
    pub fn block_class(&self) -> STRef<Class> {
        self.core.block_class.clone()
    }
    /// Get the **Error** class.
    pub fn error_class(&self) -> STRef<Class> {
        self.core.error_class.clone()
    }
    /// Get the **ExceptionSet** class.
    pub fn exception_set_class(&self) -> STRef<Class> {
        self.core.exception_set_class.clone()
    }
}
