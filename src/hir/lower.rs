//! Lowering parsed descriptors into semantic items.

use super::ids::ElementId;
use super::input::RootId;
use super::module_index::ModuleDeclaration;
use super::module_ref::ModuleReference;
use crate::base::FileId;
use crate::syntax::ModuleDescriptor;

/// The module a descriptor declares, if it has a name.
pub fn module_declaration(
    file: FileId,
    root: RootId,
    descriptor: &ModuleDescriptor,
) -> Option<ModuleDeclaration> {
    let name = descriptor.name.as_ref()?;
    Some(ModuleDeclaration {
        id: ElementId::module_name(file),
        name: name.text.clone(),
        name_range: name.range,
        root,
        is_open: descriptor.is_open,
    })
}

/// Every module reference of a descriptor, numbered in source order.
pub fn module_references(file: FileId, descriptor: &ModuleDescriptor) -> Vec<ModuleReference> {
    descriptor
        .module_refs()
        .enumerate()
        .map(|(ordinal, (kind, name))| ModuleReference {
            owner: ElementId::reference(file, ordinal as u32),
            text: name.text.clone(),
            range: name.range,
            kind,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{ModuleRefKind, parse};

    #[test]
    fn test_lower_descriptor() {
        let text = "open module app { requires core; exports api to web; }";
        let descriptor = parse(text).descriptor.unwrap();
        let file = FileId::new(4);

        let declaration = module_declaration(file, RootId(0), &descriptor).unwrap();
        assert_eq!(declaration.name, "app");
        assert!(declaration.is_open);
        assert_eq!(&text[declaration.name_range], "app");

        let refs = module_references(file, &descriptor);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].owner, ElementId::reference(file, 0));
        assert_eq!(refs[1].kind, ModuleRefKind::ExportsTo);
        assert_eq!(&text[refs[1].range], "web");
    }

    #[test]
    fn test_nameless_descriptor_declares_nothing() {
        let descriptor = parse("module { }").descriptor.unwrap();
        let declaration = module_declaration(FileId::new(0), RootId(0), &descriptor);
        assert!(declaration.is_none());
    }
}
