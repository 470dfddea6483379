/// Primitives for the **Array** class.
pub mod array;
/// Primitives for the **Block** class.
pub mod blocks;
/// Primitives for the **Boolean** class.
pub mod boolean;
/// Primitives for the **Class** class.
pub mod class;
/// Primitives for the **Exception** and **ExceptionSet** classes.
pub mod exception;
/// Primitives for the **Integer** class.
pub mod integer;
/// Primitives for the **Object** and **UndefinedObject** classes.
pub mod object;
/// Primitives for the **String** and **Symbol** classes.
pub mod string;

use crate::invokable::Return;
use crate::universe::Universe;
use crate::value::Value;

/// A interpreter primitive (just a bare function pointer).
///
/// The receiver comes first in `args`.
pub type PrimitiveFn = fn(universe: &mut Universe, args: Vec<Value>) -> Return;

/// Macro for checking and destructuring arguments passed to primitives.
///
/// Mismatches signal a `PrimitiveFailed` condition from the enclosing primitive.
#[macro_export]
macro_rules! expect_args {
    ($signature:expr, $universe:expr, $args:expr, [ $( $ptrn:pat $( => $name:ident )? ),* $(,)? ]) => {
        #[allow(unused_mut)]
        let ($($(mut $name,)?)*) = {
            #[allow(unused_variables, unused_mut)]
            let mut iter = $args.into_iter();
            $(#[allow(unreachable_patterns)]
            $(let $name =)? match iter.next() {
                Some($ptrn) => {$($name)?},
                Some(_) => return $universe.primitive_failed(format!("'{}': wrong type(s)", $signature)),
                None => return $universe.primitive_failed(format!("'{}': missing argument", $signature)),
            };)*
            ($($($name,)?)*)
        };
    };
}

/// Get the class-side primitives for the given built-in class.
pub fn get_class_primitives(class_name: &str) -> Option<&'static [(&'static str, PrimitiveFn)]> {
    match class_name {
        "Array" => Some(self::array::CLASS_PRIMITIVES),
        "Exception" => Some(self::exception::CLASS_PRIMITIVES),
        _ => None,
    }
}

/// Get the instance-side primitives for the given built-in class.
pub fn get_instance_primitives(
    class_name: &str,
) -> Option<&'static [(&'static str, PrimitiveFn)]> {
    match class_name {
        "Array" => Some(self::array::INSTANCE_PRIMITIVES),
        "Block" => Some(self::blocks::INSTANCE_PRIMITIVES),
        "Boolean" => Some(self::boolean::INSTANCE_PRIMITIVES),
        "Class" => Some(self::class::INSTANCE_PRIMITIVES),
        "Exception" => Some(self::exception::INSTANCE_PRIMITIVES),
        "ExceptionSet" => Some(self::exception::EXCEPTION_SET_PRIMITIVES),
        "Integer" => Some(self::integer::INSTANCE_PRIMITIVES),
        "Object" => Some(self::object::INSTANCE_PRIMITIVES),
        "UndefinedObject" => Some(self::object::NIL_PRIMITIVES),
        "String" => Some(self::string::INSTANCE_PRIMITIVES),
        "Symbol" => Some(self::string::SYMBOL_PRIMITIVES),
        _ => None,
    }
}
