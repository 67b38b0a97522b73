mod fold;

pub use fold::{
    walk_block, walk_constructor, walk_element, walk_expression, walk_field, walk_method,
    walk_navigation, walk_parameter, walk_script, walk_statement, walk_type_declaration, Folder,
};
