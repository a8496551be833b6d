//! Completion Pass (Pass 2) - Resolve members, attributes and constants.
//!
//! With every type registered, this pass walks the trees again with a
//! [`Scope`] for each declaration and:
//!
//! 1. resolves `using` directives into scope levels
//! 2. adds members to their type entries, resolving their types
//! 3. resolves each attribute usage to its attribute class
//! 4. evaluates `const` field initializers and attribute arguments
//!
//! Nothing here fails the compilation: names that do not resolve stay
//! unresolved, and arguments that are not constants keep their
//! [`ConstantError`](derived_props_core::ConstantError) for the consumer
//! to report.

use derived_props_core::{
    AttributeArgument, AttributeData, DeclId, EventEntry, FieldEntry, GetterSyntax, MemberEntry,
    MethodEntry, PropertyDeclaration, PropertyEntry, SourceId, TypeHash, TypeSource,
};
use derived_props_parser::{
    Attribute, AttributeArg, MemberDecl, NamespaceMember, TypeDecl, TypeSyntax, UsingDirective,
    UsingKind,
};
use petgraph::graph::NodeIndex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::compilation::SourceTree;
use crate::const_eval::{ConstEvaluator, FieldKey, PendingConst};
use crate::registry::TypeRegistry;
use crate::resolver::TypeResolver;
use crate::scope::{AliasTarget, Scope, ScopeLevel};

/// Output of the completion pass.
#[derive(Debug, Default)]
pub struct CompletionOutput {
    /// Number of members added to type entries.
    pub members_added: usize,
    /// Number of attribute usages recorded.
    pub attributes_recorded: usize,
    /// Attribute usages whose class did not resolve.
    pub unresolved_attributes: usize,
    /// Number of `const` fields evaluated successfully.
    pub constants_evaluated: usize,
    /// `using` directives whose target did not resolve.
    pub unresolved_usings: usize,
}

/// An attribute usage waiting for argument evaluation.
struct PendingAttribute<'t> {
    owner: TypeHash,
    declaration: DeclId,
    attribute: &'t Attribute,
    class: Option<TypeHash>,
    scope: usize,
    source: &'t str,
}

/// A member collected from syntax, applied once collection is done.
struct PendingMember {
    owner: TypeHash,
    member: MemberEntry,
    partial: bool,
}

/// Everything the syntax walk collects.
#[derive(Default)]
struct Collected<'t> {
    scopes: Vec<Scope>,
    members: Vec<PendingMember>,
    consts: FxHashMap<FieldKey, PendingConst<'t>>,
    attributes: Vec<PendingAttribute<'t>>,
    unresolved_usings: usize,
}

/// Pass 2: resolve members, attributes and constants.
pub struct CompletionPass<'a> {
    registry: &'a mut TypeRegistry,
    declarations: &'a FxHashMap<DeclId, TypeHash>,
}

impl<'a> CompletionPass<'a> {
    /// Create a completion pass over the declarations registered by Pass 1.
    pub fn new(registry: &'a mut TypeRegistry, declarations: &'a FxHashMap<DeclId, TypeHash>) -> Self {
        Self {
            registry,
            declarations,
        }
    }

    /// Run the completion pass over the trees, in order.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(self, trees: &[SourceTree]) -> CompletionOutput {
        let mut output = CompletionOutput::default();

        let collected = {
            let walker = SyntaxWalker {
                registry: &*self.registry,
                declarations: self.declarations,
                collected: Collected::default(),
            };
            walker.walk(trees)
        };
        output.unresolved_usings = collected.unresolved_usings;

        for pending in collected.members {
            if apply_member(self.registry, pending) {
                output.members_added += 1;
            }
        }

        let registry: &TypeRegistry = self.registry;
        let mut evaluator = ConstEvaluator::new(registry, &collected.scopes, &collected.consts);

        evaluator.evaluate_all();

        let mut attributes = Vec::with_capacity(collected.attributes.len());
        for pending in &collected.attributes {
            let Some(scope) = collected.scopes.get(pending.scope) else {
                continue;
            };
            let arguments = pending
                .attribute
                .constructor_arguments()
                .map(|arg| evaluate_argument(&mut evaluator, arg, scope, pending.source))
                .collect();
            let named_arguments = pending
                .attribute
                .named()
                .map(|(name, arg)| {
                    let value = evaluate_argument(&mut evaluator, arg, scope, pending.source);
                    (name.name.clone(), value)
                })
                .collect();
            if pending.class.is_none() {
                output.unresolved_attributes += 1;
            }
            attributes.push((
                pending.owner,
                AttributeData {
                    attribute_class: pending.class,
                    written_name: pending.attribute.name.to_string(),
                    arguments,
                    named_arguments,
                    declaration: pending.declaration,
                    span: pending.attribute.span,
                },
            ));
        }

        let values = evaluator.into_values();
        for ((ty, name), value) in values {
            let Ok(value) = value else {
                continue;
            };
            let Some(entry) = self.registry.get_mut(ty) else {
                continue;
            };
            for member in &mut entry.members {
                if let MemberEntry::Field(field) = member
                    && field.name == name
                    && field.modifiers.is_const()
                {
                    field.constant_value = Some(value.clone());
                    output.constants_evaluated += 1;
                }
            }
        }

        for (owner, data) in attributes {
            if let Some(entry) = self.registry.get_mut(owner) {
                entry.attributes.push(data);
                output.attributes_recorded += 1;
            }
        }

        output
    }
}

fn evaluate_argument(
    evaluator: &mut ConstEvaluator<'_>,
    arg: &AttributeArg,
    scope: &Scope,
    source: &str,
) -> AttributeArgument {
    AttributeArgument {
        value: evaluator.evaluate(&arg.value, scope, source),
        text: arg.value.span().slice(source).unwrap_or_default().to_string(),
        span: arg.span,
    }
}

/// Add a collected member to its type, merging partial declarations.
fn apply_member(registry: &mut TypeRegistry, pending: PendingMember) -> bool {
    let Some(entry) = registry.get_mut(pending.owner) else {
        return false;
    };
    match pending.member {
        MemberEntry::Property(mut property) if pending.partial => {
            let existing = entry.members.iter_mut().find_map(|m| match m {
                MemberEntry::Property(p) if p.name == property.name && p.modifiers.is_partial() => Some(p),
                _ => None,
            });
            if let Some(existing) = existing {
                existing.declarations.append(&mut property.declarations);
                existing.modifiers |= property.modifiers;
                return false;
            }
            entry.members.push(MemberEntry::Property(property));
        }
        MemberEntry::Method(method) if pending.partial => {
            let declared = entry.members.iter().any(|m| {
                matches!(m, MemberEntry::Method(existing) if existing.name == method.name && existing.modifiers.is_partial())
            });
            if declared {
                return false;
            }
            entry.members.push(MemberEntry::Method(method));
        }
        MemberEntry::NestedType { name, type_hash } => {
            let declared = entry
                .members
                .iter()
                .any(|m| matches!(m, MemberEntry::NestedType { type_hash: h, .. } if *h == type_hash));
            if declared {
                return false;
            }
            entry.members.push(MemberEntry::NestedType { name, type_hash });
        }
        member => entry.members.push(member),
    }
    true
}

/// Walks syntax with the registry borrowed immutably.
struct SyntaxWalker<'r, 't> {
    registry: &'r TypeRegistry,
    declarations: &'r FxHashMap<DeclId, TypeHash>,
    collected: Collected<'t>,
}

impl<'r, 't> SyntaxWalker<'r, 't> {
    fn walk(mut self, trees: &'t [SourceTree]) -> Collected<'t> {
        let root = self.registry.namespaces().root();
        let global_usings: Vec<&UsingDirective> = trees
            .iter()
            .flat_map(|tree| tree.syntax.usings.iter())
            .filter(|using| using.is_global)
            .collect();
        let unit = Scope::compilation_unit(ScopeLevel::new(root));
        let global_level = self.build_level(root, global_usings, &unit);

        for tree in trees {
            let mut level = global_level.clone();
            let file_usings = tree.syntax.usings.iter().filter(|u| !u.is_global).collect();
            let file_level = self.build_level(root, file_usings, &unit);
            level.usings.extend(file_level.usings);
            level.static_usings.extend(file_level.static_usings);
            level.aliases.extend(file_level.aliases);

            let scope = Scope::compilation_unit(level);
            let file = TreeContext {
                id: tree.id,
                text: &tree.text,
                kind: tree.kind,
            };
            self.visit_members(&tree.syntax.members, root, &scope, &file);
        }
        self.collected
    }

    /// Resolve a level's `using` directives. Targets are looked up from
    /// `outer` extended with the level's own namespace.
    fn build_level(&mut self, namespace: NodeIndex, usings: Vec<&UsingDirective>, outer: &Scope) -> ScopeLevel {
        let mut level = ScopeLevel::new(namespace);
        if usings.is_empty() {
            return level;
        }
        let lookup_scope = if outer.current_namespace() == Some(namespace) {
            outer.clone()
        } else {
            outer.enter_namespace(ScopeLevel::new(namespace))
        };
        let resolver = TypeResolver::new(self.registry, &lookup_scope);

        for using in usings {
            let resolved = match &using.kind {
                UsingKind::Namespace => match namespace_path(&using.target)
                    .and_then(|path| resolver.lookup_namespace(&path))
                {
                    Some(node) => {
                        if !level.usings.contains(&node) {
                            level.usings.push(node);
                        }
                        true
                    }
                    None => false,
                },
                UsingKind::Static => match resolver.resolve(&using.target).definition() {
                    Some(ty) => {
                        level.static_usings.push(ty);
                        true
                    }
                    None => false,
                },
                UsingKind::Alias(alias) => {
                    let target = namespace_path(&using.target)
                        .and_then(|path| resolver.lookup_namespace(&path))
                        .map(AliasTarget::Namespace)
                        .or_else(|| {
                            let ty = resolver.resolve(&using.target);
                            ty.definition().is_some().then_some(AliasTarget::Type(ty))
                        });
                    match target {
                        Some(target) => {
                            level.aliases.insert(alias.name.clone(), target);
                            true
                        }
                        None => false,
                    }
                }
            };
            if !resolved {
                trace!(target = %using.target, "using directive did not resolve");
                self.collected.unresolved_usings += 1;
            }
        }
        level
    }

    fn visit_members(
        &mut self,
        members: &'t [NamespaceMember],
        namespace: NodeIndex,
        scope: &Scope,
        file: &TreeContext<'t>,
    ) {
        for member in members {
            match member {
                NamespaceMember::Namespace(ns) => {
                    let mut node = namespace;
                    let mut inner = scope.clone();
                    let path = ns.path();
                    for (i, segment) in path.iter().enumerate() {
                        let Some(child) = self.registry.namespaces().find_child(node, segment) else {
                            break;
                        };
                        node = child;
                        inner = if i + 1 == path.len() {
                            let usings = ns.usings.iter().collect();
                            let level = self.build_level(node, usings, &inner);
                            inner.enter_namespace(level)
                        } else {
                            inner.enter_namespace(ScopeLevel::new(node))
                        };
                    }
                    self.visit_members(&ns.members, node, &inner, file);
                }
                NamespaceMember::Type(decl) => self.visit_type(decl, scope, file),
            }
        }
    }

    fn visit_type(&mut self, decl: &'t TypeDecl, outer: &Scope, file: &TreeContext<'t>) {
        let Some(&owner) = self.declarations.get(&decl.id) else {
            return;
        };
        let scope = outer.enter_type(owner);
        let scope_index = self.collected.scopes.len();
        self.collected.scopes.push(scope.clone());

        let resolver = TypeResolver::new(self.registry, &scope);
        for attribute in decl.all_attributes() {
            let class = resolver.lookup_attribute(&attribute.name);
            trace!(attribute = %attribute.name, decl = %decl.id, resolved = class.is_some(), "attribute usage");
            self.collected.attributes.push(PendingAttribute {
                owner,
                declaration: decl.id,
                attribute,
                class,
                scope: scope_index,
                source: file.text,
            });
        }

        for member in &decl.members {
            self.visit_member(member, owner, &resolver, scope_index, file);
        }

        for nested in decl.nested_types() {
            self.visit_type(nested, &scope, file);
        }
    }

    fn visit_member(
        &mut self,
        member: &'t MemberDecl,
        owner: TypeHash,
        resolver: &TypeResolver<'_>,
        scope_index: usize,
        file: &TreeContext<'t>,
    ) {
        let push = |collected: &mut Collected<'t>, member: MemberEntry, partial: bool| {
            collected.members.push(PendingMember {
                owner,
                member,
                partial,
            });
        };

        match member {
            MemberDecl::Field(field) => {
                let ty = resolver.resolve(&field.ty);
                for declarator in &field.declarators {
                    let entry = FieldEntry::new(declarator.name.name.clone(), ty.clone(), field.modifiers);
                    if field.modifiers.is_const()
                        && let Some(initializer) = &declarator.initializer
                    {
                        self.collected.consts.insert(
                            (owner, declarator.name.name.clone()),
                            PendingConst {
                                expr: initializer,
                                scope: scope_index,
                                source: file.text,
                            },
                        );
                    }
                    push(&mut self.collected, MemberEntry::Field(entry), false);
                }
            }
            MemberDecl::Property(property) => {
                let getter = match file.kind {
                    TypeSource::Source => property.getter().and_then(|(form, span)| {
                        span.slice(file.text).map(|text| GetterSyntax {
                            form,
                            text: text.to_string(),
                            span,
                        })
                    }),
                    TypeSource::Metadata => None,
                };
                let mut entry = PropertyEntry::new(
                    property.name.name.clone(),
                    resolver.resolve(&property.ty),
                    property.modifiers,
                );
                entry.declarations.push(PropertyDeclaration {
                    source: file.id,
                    span: property.span,
                    getter,
                    has_setter: property.has_setter(),
                });
                push(&mut self.collected, MemberEntry::Property(entry), property.modifiers.is_partial());
            }
            MemberDecl::Method(method) => {
                let entry = MethodEntry {
                    name: method.name.name.clone(),
                    modifiers: method.modifiers,
                    span: method.span,
                };
                push(&mut self.collected, MemberEntry::Method(entry), method.modifiers.is_partial());
            }
            MemberDecl::Event(event) => {
                for name in &event.names {
                    let entry = EventEntry {
                        name: name.name.clone(),
                        modifiers: event.modifiers,
                        span: event.span,
                    };
                    push(&mut self.collected, MemberEntry::Event(entry), false);
                }
            }
            MemberDecl::Type(nested) => {
                if let Some(&type_hash) = self.declarations.get(&nested.id) {
                    let entry = MemberEntry::NestedType {
                        name: nested.name.name.clone(),
                        type_hash,
                    };
                    push(&mut self.collected, entry, false);
                }
            }
            MemberDecl::Other { .. } => {}
        }
    }
}

/// The tree a declaration was read from.
struct TreeContext<'t> {
    id: SourceId,
    text: &'t str,
    kind: TypeSource,
}

/// The dotted segments of a written name that can denote a namespace.
fn namespace_path(target: &TypeSyntax) -> Option<Vec<String>> {
    let named = target.as_named()?;
    if (named.alias.is_some() && !named.is_global()) || named.is_generic() {
        return None;
    }
    Some(named.segments.iter().map(|s| s.name.name.clone()).collect())
}
