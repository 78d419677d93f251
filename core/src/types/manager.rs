use bumpalo::Bump;
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;

use crate::types::Type;

/// Arena-backed type interner.
///
/// Every [`Type`] handed out by a manager lives in its bump arena and is
/// deduplicated, so structurally equal types are also pointer-equal and
/// building a type is cheap to repeat. Fresh type variables come from a
/// monotonically increasing counter; the counter is the variable's
/// identity, which is what keeps two distinct unknowns from ever collapsing
/// into one.
pub struct TypeManager<'t> {
    // Arena holding all types from this TypeManager.
    arena: &'t Bump,
    interned: RefCell<HashMap<Type<'t>, &'t Type<'t>>>,
    next_type_var: Cell<u16>,
}

impl<'t> TypeManager<'t> {
    pub fn new(arena: &'t Bump) -> &'t Self {
        arena.alloc(Self {
            arena,
            interned: RefCell::new(HashMap::new()),
            next_type_var: Cell::new(0),
        })
    }

    fn intern(&self, ty: Type<'t>) -> &'t Type<'t> {
        if let Some(&interned_ty) = self.interned.borrow().get(&ty) {
            return interned_ty;
        }
        let arena_ty = self.arena.alloc(ty.clone());
        self.interned.borrow_mut().insert(ty, arena_ty);
        arena_ty
    }

    // Factory methods for types.
    pub fn int(&self) -> &'t Type<'t> {
        self.intern(Type::Int)
    }
    pub fn boolean(&self) -> &'t Type<'t> {
        self.intern(Type::Boolean)
    }
    pub fn str(&self) -> &'t Type<'t> {
        self.intern(Type::Str)
    }
    pub fn unit(&self) -> &'t Type<'t> {
        self.intern(Type::Unit)
    }
    pub fn str_array(&self) -> &'t Type<'t> {
        self.intern(Type::StrArray)
    }

    pub fn function(&self, param: &'t Type<'t>, ret: &'t Type<'t>) -> &'t Type<'t> {
        self.intern(Type::Function { param, ret })
    }

    /// Mint a fresh, uniquely numbered type variable.
    pub fn fresh_var(&self) -> &'t Type<'t> {
        let id = self.next_type_var.get();
        self.next_type_var
            .set(id.checked_add(1).expect("type variable id overflowed"));
        self.intern(Type::TypeVar(id))
    }

    /// Type variable with a specific id.
    pub fn type_var(&self, id: u16) -> &'t Type<'t> {
        self.intern(Type::TypeVar(id))
    }

    /// Resolve a declared type name from source text.
    ///
    /// Unknown names become fresh type variables rather than errors; such a
    /// variable is either pinned down by how the declaration is used or
    /// reported as underconstrained after substitution.
    pub fn from_name(&self, name: &str) -> &'t Type<'t> {
        match name {
            "Int" => self.int(),
            "Boolean" => self.boolean(),
            "String" => self.str(),
            "String[]" => self.str_array(),
            "Unit" => self.unit(),
            _ => self.fresh_var(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_gives_pointer_equality() {
        let arena = Bump::new();
        let types = TypeManager::new(&arena);

        assert!(core::ptr::eq(types.int(), types.int()));

        let f1 = types.function(types.int(), types.unit());
        let f2 = types.function(types.int(), types.unit());
        assert!(core::ptr::eq(f1, f2));
    }

    #[test]
    fn fresh_vars_are_distinct() {
        let arena = Bump::new();
        let types = TypeManager::new(&arena);

        let a = types.fresh_var();
        let b = types.fresh_var();
        assert_ne!(a, b);
        assert_eq!(a, &Type::TypeVar(0));
        assert_eq!(b, &Type::TypeVar(1));
    }

    #[test]
    fn from_name_resolves_known_names() {
        let arena = Bump::new();
        let types = TypeManager::new(&arena);

        assert_eq!(types.from_name("Int"), &Type::Int);
        assert_eq!(types.from_name("Boolean"), &Type::Boolean);
        assert_eq!(types.from_name("String"), &Type::Str);
        assert_eq!(types.from_name("String[]"), &Type::StrArray);
        assert_eq!(types.from_name("Unit"), &Type::Unit);
    }

    #[test]
    fn from_name_mints_fresh_var_for_unknown_names() {
        let arena = Bump::new();
        let types = TypeManager::new(&arena);

        let a = types.from_name("Strnig");
        let b = types.from_name("Strnig");
        // Two mentions of an unknown name are independent unknowns.
        assert!(matches!(a, Type::TypeVar(_)));
        assert_ne!(a, b);
    }
}
