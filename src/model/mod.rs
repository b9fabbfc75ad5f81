/*!
Feature models.

A feature model is a tree of named features together with cross-tree constraints.
- Each feature, other than the root, has a parent.
- A feature groups its children in one of three ways (see [GroupKind]).
- In an `and` group a child may be mandatory, and is then selected whenever its parent is selected.
- Constraints are [propositional expressions](expr::Expr) over feature names.

A model is produced elsewhere (by hand, by a model builder, or by a [format handler](crate::io)) and is only read by the analysis.
Analysis works on the [compiled](FeatureModel::compile) formula of a model.

```rust
# use fm_core::model::{FeatureModel, GroupKind};
# use fm_core::model::expr::Expr;
let mut model = FeatureModel::new("Phone");
model.add_child("Phone", "Calls", true);
model.add_child("Phone", "Screen", true);
model.add_child("Phone", "GPS", false);
model.add_child("Screen", "Basic", false);
model.add_child("Screen", "HighRes", false);
model.set_group("Screen", GroupKind::Alternative);
model.constraints.push(Expr::implies(Expr::var("GPS"), Expr::not(Expr::var("Basic"))));

assert_eq!(model.root().map(|root| root.name.as_str()), Ok("Phone"));
assert_eq!(model.children("Screen").count(), 2);

let cnf = model.compile().unwrap();
assert_eq!(cnf.variables.atom_count(), 6);
```
*/

mod compile;
pub mod expr;

use serde::{Deserialize, Serialize};

use crate::{model::expr::Expr, types::err};

/// How the children of a feature are grouped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Children are selected independently, unless mandatory.
    #[default]
    And,

    /// At least one child is selected with the parent.
    Or,

    /// Exactly one child is selected with the parent.
    Alternative,
}

/// A feature of a model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,

    /// The parent of the feature, with no parent for the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Whether the feature is selected whenever the parent is, within an `and` group.
    #[serde(default)]
    pub mandatory: bool,

    /// How the children of the feature are grouped.
    #[serde(default)]
    pub group: GroupKind,

    /// Abstract features structure the model, without a counterpart in source.
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
}

impl Feature {
    pub fn new(name: &str, parent: Option<&str>, mandatory: bool) -> Self {
        Feature {
            name: name.to_owned(),
            parent: parent.map(str::to_owned),
            mandatory,
            group: GroupKind::default(),
            is_abstract: false,
        }
    }

    /// Whether the feature may be deselected while the parent is selected, according to the tree alone.
    pub fn is_optional(&self, parent_group: GroupKind) -> bool {
        self.parent.is_some() && !(parent_group == GroupKind::And && self.mandatory)
    }
}

/// A feature model: a tree of features together with cross-tree constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureModel {
    #[serde(default)]
    pub name: String,

    /// Features, in order, with the root first by convention.
    pub features: Vec<Feature>,

    #[serde(default)]
    pub constraints: Vec<Expr>,
}

impl FeatureModel {
    /// A model with a single (root) feature of the given name.
    pub fn new(root: &str) -> Self {
        FeatureModel {
            name: root.to_owned(),
            features: vec![Feature::new(root, None, false)],
            constraints: Vec::default(),
        }
    }

    /// Adds a feature as a child of some parent.
    /// The parent is not required to exist until the model is compiled.
    pub fn add_child(&mut self, parent: &str, name: &str, mandatory: bool) -> &mut Feature {
        self.features.push(Feature::new(name, Some(parent), mandatory));
        let last = self.features.len() - 1;
        &mut self.features[last]
    }

    /// Sets the group of the children of a feature.
    /// Returns false if there is no such feature.
    pub fn set_group(&mut self, name: &str, group: GroupKind) -> bool {
        match self.features.iter_mut().find(|feature| feature.name == name) {
            Some(feature) => {
                feature.group = group;
                true
            }
            None => false,
        }
    }

    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.name == name)
    }

    /// The children of a feature, in order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Feature> + 'a {
        self.features
            .iter()
            .filter(move |feature| feature.parent.as_deref() == Some(name))
    }

    /// The (unique) feature without a parent.
    pub fn root(&self) -> Result<&Feature, err::CompileError> {
        let mut roots = self.features.iter().filter(|feature| feature.parent.is_none());
        match (roots.next(), roots.next()) {
            (None, _) => Err(err::CompileError::NoRoot),
            (Some(root), None) => Ok(root),
            (Some(first), Some(second)) => Err(err::CompileError::MultipleRoots(
                first.name.clone(),
                second.name.clone(),
            )),
        }
    }

    /// Whether the feature may be deselected while the parent is selected, according to the tree alone.
    pub fn is_optional(&self, name: &str) -> bool {
        match self.feature(name) {
            None => false,
            Some(feature) => {
                let parent_group = feature
                    .parent
                    .as_deref()
                    .and_then(|parent| self.feature(parent))
                    .map(|parent| parent.group)
                    .unwrap_or_default();
                feature.is_optional(parent_group)
            }
        }
    }
}
