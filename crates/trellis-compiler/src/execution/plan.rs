//! Compiling a validated selection set into the canonical execution tree.

use crate::ast;
use crate::ast::DirectiveList;
use crate::ast::Selection;
use crate::collections::IndexMap;
use crate::execution::directives;
use crate::execution::JsonMap;
use trellis_parser::Name;
use trellis_parser::Node;

/// Planning failure.
///
/// The document must have passed validation before planning, so an
/// unresolvable fragment here indicates a validator/planner inconsistency
/// rather than bad user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("fragment `{name}` is not defined; the document was not validated before planning")]
    UndefinedFragment { name: Name },
}

/// One node of the execution plan: a requested field, or a type-conditioned
/// branch produced by flattening an inline fragment or fragment spread.
///
/// Fragment spreads never survive into the plan as a distinct node kind;
/// they are inlined as subtrees carrying the fragment's type condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanNode {
    /// The field name; `None` for type-conditioned branches.
    pub name: Option<Name>,

    /// The type condition; `None` for plain fields.
    pub type_condition: Option<Name>,

    pub arguments: Vec<Node<ast::Argument>>,
    pub directives: DirectiveList,
    pub children: Vec<PlanNode>,
}

impl PlanNode {
    /// Whether this node is a type-conditioned branch.
    pub fn is_fragment(&self) -> bool {
        self.type_condition.is_some()
    }

    /// Whether any descendant carries a type condition. Consumers use this
    /// to detect that an interface- or union-typed field needs its concrete
    /// type resolved before picking a branch.
    pub fn has_fragment(&self) -> bool {
        self.children
            .iter()
            .any(|child| child.type_condition.is_some() || child.has_fragment())
    }

    /// The type condition of the first type-conditioned descendant,
    /// depth-first.
    pub fn fragment_type(&self) -> Option<&Name> {
        for child in &self.children {
            if let Some(condition) = &child.type_condition {
                return Some(condition);
            }
            if let Some(condition) = child.fragment_type() {
                return Some(condition);
            }
        }
        None
    }

    /// The first child for the given field name.
    pub fn child(&self, name: &str) -> Option<&PlanNode> {
        self.children
            .iter()
            .find(|child| child.name.as_deref() == Some(name))
    }

    /// Evaluates this node's `@include`/`@skip` directives against runtime
    /// variables.
    pub fn should_include(&self, variables: &JsonMap) -> bool {
        directives::should_include(&self.directives, variables)
    }
}

/// Compiles a validated selection set into plan nodes, one per selection,
/// resolving fragment spreads through `fragments` and flattening them into
/// type-conditioned subtrees.
pub fn plan_execution(
    selections: &[Selection],
    fragments: &IndexMap<Name, Node<ast::FragmentDefinition>>,
) -> Result<Vec<PlanNode>, PlanError> {
    selections
        .iter()
        .map(|selection| plan_selection(selection, fragments))
        .collect()
}

/// Plans an operation's top-level selection set.
pub fn plan_operation(
    operation: &ast::OperationDefinition,
    fragments: &IndexMap<Name, Node<ast::FragmentDefinition>>,
) -> Result<Vec<PlanNode>, PlanError> {
    let plan = plan_execution(&operation.selection_set, fragments)?;
    tracing::debug!(
        operation_type = operation.operation_type.name(),
        roots = plan.len(),
        "planned execution"
    );
    Ok(plan)
}

fn plan_selection(
    selection: &Selection,
    fragments: &IndexMap<Name, Node<ast::FragmentDefinition>>,
) -> Result<PlanNode, PlanError> {
    match selection {
        Selection::Field(field) => Ok(PlanNode {
            name: Some(field.name.clone()),
            type_condition: None,
            arguments: field.arguments.clone(),
            directives: field.directives.clone(),
            children: plan_execution(&field.selection_set, fragments)?,
        }),
        Selection::InlineFragment(inline) => Ok(PlanNode {
            name: None,
            type_condition: Some(inline.type_condition.clone()),
            arguments: Vec::new(),
            directives: inline.directives.clone(),
            children: plan_execution(&inline.selection_set, fragments)?,
        }),
        Selection::FragmentSpread(spread) => {
            let Some(fragment) = fragments.get(spread.fragment_name.as_str()) else {
                return Err(PlanError::UndefinedFragment {
                    name: spread.fragment_name.clone(),
                });
            };
            Ok(PlanNode {
                name: None,
                type_condition: Some(fragment.type_condition.clone()),
                arguments: Vec::new(),
                directives: spread.directives.clone(),
                children: plan_execution(&fragment.selection_set, fragments)?,
            })
        }
    }
}
