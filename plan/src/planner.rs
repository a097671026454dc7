//! The MaterializationPlanner.
//!
//! Walks an evaluated template tree top-down, validates each level against
//! the schema, enforces structural constraints, and queues deferred
//! mutations. Constraint checks always precede any queued mutation for the
//! node they guard, and a node's own properties are queued before its
//! children are planned.

use crate::{MutationOp, MutationPlan, PlanError, TransientNode};
use graft_core::{normalize_name, slugify, ContentGraphLookup, ErrorSink, Value};
use graft_schema::{SchemaProvider, TypeDef};
use graft_template::{RootTemplate, Template};
use graft_validate::{PropertyConverter, SchemaValidator};
use tracing::debug;

/// Derived slug property for document-kind nodes.
const SLUG_PROPERTY: &str = "slug";
const TITLE_PROPERTY: &str = "title";

/// Plans deferred mutations from an evaluated template tree.
///
/// The planner never touches a content graph; it emits a [`MutationPlan`]
/// for an executor to interpret. Violations are captured into the sink and
/// skip the offending subtree only.
pub struct MaterializationPlanner<'a> {
    schema: &'a dyn SchemaProvider,
    validator: SchemaValidator<'a>,
    lookup: &'a dyn ContentGraphLookup,
}

impl<'a> MaterializationPlanner<'a> {
    /// Create a planner over a schema, a class-property converter and a
    /// reference-resolution lookup.
    pub fn new(
        schema: &'a dyn SchemaProvider,
        converter: &'a dyn PropertyConverter,
        lookup: &'a dyn ContentGraphLookup,
    ) -> Self {
        Self {
            schema,
            validator: SchemaValidator::new(converter),
            lookup,
        }
    }

    /// Plan mutations for a root template applied to an existing node of
    /// the given type.
    pub fn plan_root(
        &self,
        root: &RootTemplate,
        root_type: &str,
        sink: &mut ErrorSink,
    ) -> MutationPlan {
        let mut plan = MutationPlan::new();
        let Some(def) = self.schema.get_type(root_type) else {
            sink.capture(PlanError::unknown_type(root_type), root_type);
            return plan;
        };

        self.queue_mutations(&root.properties, def, sink, &mut plan);
        self.plan_children(
            &root.children,
            &TransientNode::regular(root_type),
            sink,
            &mut plan,
        );
        plan
    }

    /// Validate one level's properties and queue the surviving mutations.
    fn queue_mutations(
        &self,
        properties: &indexmap::IndexMap<String, Value>,
        def: &TypeDef,
        sink: &mut ErrorSink,
        plan: &mut MutationPlan,
    ) {
        let validated = self.validator.validate(properties, def, self.lookup, sink);
        let mut properties = validated.properties;
        derive_slug(&mut properties, def);

        if !properties.is_empty() {
            plan.push(MutationOp::SetProperties { properties });
        }
        if !validated.references.is_empty() {
            plan.push(MutationOp::SetReferences {
                references: validated.references,
            });
        }
    }

    fn plan_children(
        &self,
        children: &[Template],
        parent: &TransientNode,
        sink: &mut ErrorSink,
        plan: &mut MutationPlan,
    ) {
        for child in children {
            self.plan_child(child, parent, sink, plan);
        }
    }

    /// Plan one child. Every child gets its own isolated frame so a
    /// mid-frame execution failure cannot leak a dangling cursor or
    /// half-applied mutations into its siblings.
    fn plan_child(
        &self,
        child: &Template,
        parent: &TransientNode,
        sink: &mut ErrorSink,
        plan: &mut MutationPlan,
    ) {
        let Some(parent_def) = self.schema.get_type(&parent.type_name) else {
            sink.capture(
                PlanError::unknown_type(&parent.type_name),
                child_origin(child),
            );
            return;
        };

        let normalized = child.name.as_deref().map(normalize_name);

        // Names matching a tethered slot select the auto-created child
        // instead of creating a new node.
        if let Some(name) = &normalized {
            if let Some(slot) = parent_def.tethered_slot(name) {
                let slot = slot.clone();
                self.plan_tethered_child(child, &slot, parent, sink, plan);
                return;
            }
        }

        let Some(type_name) = &child.type_name else {
            debug!(parent = %parent.type_name, "skipping untyped child");
            sink.capture(PlanError::MissingType, child_origin(child));
            return;
        };
        let Some(def) = self.schema.get_type(type_name) else {
            sink.capture(PlanError::unknown_type(type_name), child_origin(child));
            return;
        };
        if def.is_abstract {
            sink.capture(PlanError::abstract_type(type_name), child_origin(child));
            return;
        }
        if !self.creation_permitted(type_name, parent, parent_def, sink, child) {
            return;
        }

        let mut frame = MutationPlan::new();
        frame.push(MutationOp::CreateAndSelectChild {
            type_name: type_name.clone(),
            name: normalized,
        });
        self.queue_mutations(&child.properties, def, sink, &mut frame);
        self.plan_children(
            &child.children,
            &TransientNode::regular(type_name.clone()),
            sink,
            &mut frame,
        );
        plan.push(MutationOp::Isolated { plan: frame });
    }

    /// A child matching a tethered slot: select the existing auto-created
    /// node, never create. Setting `type` on a slot is captured and ignored
    /// even when it names the declared type; the schema always wins.
    fn plan_tethered_child(
        &self,
        child: &Template,
        slot: &graft_schema::TetheredSlot,
        parent: &TransientNode,
        sink: &mut ErrorSink,
        plan: &mut MutationPlan,
    ) {
        if let Some(attempted) = &child.type_name {
            sink.capture(
                PlanError::retyped_tethered_slot(&slot.name, attempted),
                slot.name.clone(),
            );
        }

        let Some(slot_def) = self.schema.get_type(&slot.child_type) else {
            sink.capture(
                PlanError::unknown_type(&slot.child_type),
                slot.name.clone(),
            );
            return;
        };

        let mut frame = MutationPlan::new();
        frame.push(MutationOp::SelectChild {
            name: slot.name.clone(),
        });
        self.queue_mutations(&child.properties, slot_def, sink, &mut frame);
        self.plan_children(
            &child.children,
            &TransientNode::tethered(&slot.child_type, &slot.name, &parent.type_name),
            sink,
            &mut frame,
        );
        plan.push(MutationOp::Isolated { plan: frame });
    }

    /// Check whether creating `type_name` under `parent` is permitted.
    /// Inside a tethered slot, the slot's declaring type owns the
    /// constraints; without a per-slot declaration the slot type's own
    /// child constraints apply.
    fn creation_permitted(
        &self,
        type_name: &str,
        parent: &TransientNode,
        parent_def: &TypeDef,
        sink: &mut ErrorSink,
        child: &Template,
    ) -> bool {
        if let Some(origin) = &parent.tethered {
            let per_slot = self
                .schema
                .get_type(&origin.declaring_type)
                .and_then(|d| d.grandchild_constraints_for(&origin.slot_name));
            if let Some(constraints) = per_slot {
                if !constraints.permits(type_name) {
                    debug!(
                        child_type = type_name,
                        slot = %origin.slot_name,
                        "grandchild type not permitted"
                    );
                    sink.capture(
                        PlanError::grandchild_type_not_allowed(
                            type_name,
                            &origin.slot_name,
                            &origin.declaring_type,
                        ),
                        child_origin(child),
                    );
                    return false;
                }
                return true;
            }
        }

        if !parent_def.allows_child_type(type_name) {
            debug!(
                child_type = type_name,
                parent_type = %parent_def.name,
                "child type not permitted"
            );
            sink.capture(
                PlanError::child_type_not_allowed(type_name, &parent_def.name),
                child_origin(child),
            );
            return false;
        }
        true
    }
}

/// Documents get a `slug` derived from `title` unless the template set one
/// explicitly.
fn derive_slug(properties: &mut indexmap::IndexMap<String, Value>, def: &TypeDef) {
    if !def.is_document() || properties.contains_key(SLUG_PROPERTY) {
        return;
    }
    if let Some(Value::String(title)) = properties.get(TITLE_PROPERTY) {
        let slug = slugify(title);
        if !slug.is_empty() {
            properties.insert(SLUG_PROPERTY.to_string(), Value::String(slug));
        }
    }
}

/// Best-effort label for error origins: the child's name, else its type.
fn child_origin(child: &Template) -> String {
    child
        .name
        .clone()
        .or_else(|| child.type_name.clone())
        .unwrap_or_else(|| "unnamed child".to_string())
}
