//! Declaring-type decoration
//!
//! Records on every method the fully-qualified name of the type that encloses
//! it. A method that already carries a declaring type keeps it.

use super::AnalysisPass;
use crate::ast::{MethodDeclaration, Script, TypeDeclaration};
use crate::core::context::AnalysisContext;
use crate::visitors::{walk_method, walk_type_declaration, Folder};

pub struct DeclaringTypeDecorator;

impl AnalysisPass for DeclaringTypeDecorator {
    fn name(&self) -> &'static str {
        "declaring-type"
    }

    fn apply(&self, script: Script, context: &mut AnalysisContext) -> Script {
        DeclaringTypeFolder {
            context,
            enclosing: Vec::new(),
        }
        .fold_script(script)
    }
}

struct DeclaringTypeFolder<'a> {
    context: &'a mut AnalysisContext,
    enclosing: Vec<String>,
}

impl Folder for DeclaringTypeFolder<'_> {
    fn context(&mut self) -> &mut AnalysisContext {
        self.context
    }

    fn fold_type_declaration(&mut self, declaration: TypeDeclaration) -> TypeDeclaration {
        let qualified = self.context.qualify(&declaration.name);
        self.enclosing.push(qualified);
        let declaration = walk_type_declaration(self, declaration);
        self.enclosing.pop();
        declaration
    }

    fn fold_method(&mut self, method: MethodDeclaration) -> MethodDeclaration {
        let mut method = walk_method(self, method);
        if method.declaring_type.is_none() {
            method.declaring_type = self.enclosing.last().cloned();
        }
        method
    }
}
