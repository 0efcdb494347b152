//! The section tree and element lookup.

use crate::model::element::PortfolioElement;
use serde::{Deserialize, Serialize};

/// Where an element was found by [`PortfolioLayout::find_element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementLocation {
    /// Top-level entry of the legacy `elements` list.
    Legacy { index: usize },
    /// A section in `sections`.
    Section { index: usize },
    /// A child of the section at `section`.
    Child { section: usize, index: usize },
}

/// Result of an element lookup.
#[derive(Debug, Clone, Copy)]
pub struct FoundElement<'a> {
    pub element: &'a PortfolioElement,
    pub location: ElementLocation,
    /// Id of the containing section, for children only.
    pub section_id: Option<&'a str>,
}

impl FoundElement<'_> {
    pub fn section_index(&self) -> Option<usize> {
        match self.location {
            ElementLocation::Child { section, .. } => Some(section),
            _ => None,
        }
    }
}

/// The page: ordered sections plus a legacy flat list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioLayout {
    /// Legacy flat list. Not rendered.
    #[serde(default)]
    pub elements: Vec<PortfolioElement>,
    #[serde(default)]
    pub sections: Vec<PortfolioElement>,
}

impl PortfolioLayout {
    /// A layout with one default section.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            sections: vec![PortfolioElement::default_section()],
        }
    }

    /// Find an element by id.
    ///
    /// Legacy elements are searched first, then each section followed by its
    /// children. The first match wins.
    pub fn find_element(&self, id: &str) -> Option<FoundElement<'_>> {
        if let Some(index) = self.elements.iter().position(|e| e.id == id) {
            return Some(FoundElement {
                element: &self.elements[index],
                location: ElementLocation::Legacy { index },
                section_id: None,
            });
        }

        for (section_index, section) in self.sections.iter().enumerate() {
            if section.id == id {
                return Some(FoundElement {
                    element: section,
                    location: ElementLocation::Section {
                        index: section_index,
                    },
                    section_id: None,
                });
            }
            let children = section.children().unwrap_or_default();
            if let Some(index) = children.iter().position(|child| child.id == id) {
                return Some(FoundElement {
                    element: &children[index],
                    location: ElementLocation::Child {
                        section: section_index,
                        index,
                    },
                    section_id: Some(section.id.as_str()),
                });
            }
        }

        None
    }

    /// Mutable access to an element, using the same search order as
    /// [`find_element`](Self::find_element).
    pub fn element_mut(&mut self, id: &str) -> Option<&mut PortfolioElement> {
        let location = self.find_element(id)?.location;
        match location {
            ElementLocation::Legacy { index } => self.elements.get_mut(index),
            ElementLocation::Section { index } => self.sections.get_mut(index),
            ElementLocation::Child { section, index } => self
                .sections
                .get_mut(section)
                .and_then(PortfolioElement::children_mut)
                .and_then(|children| children.get_mut(index)),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_element(id).is_some()
    }

    pub fn section_index(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|section| section.id == id)
    }

    pub fn section(&self, id: &str) -> Option<&PortfolioElement> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Children of the section at `index`, or an empty slice.
    pub fn children_of(&self, index: usize) -> &[PortfolioElement] {
        self.sections
            .get(index)
            .and_then(PortfolioElement::children)
            .unwrap_or_default()
    }

    /// Number of elements placed inside sections.
    pub fn child_count(&self) -> usize {
        (0..self.sections.len()).map(|i| self.children_of(i).len()).sum()
    }

    /// Remove an element from wherever it lives. Sections are removed
    /// regardless of how many remain; callers enforce that invariant.
    pub fn detach(&mut self, id: &str) -> Option<PortfolioElement> {
        let location = self.find_element(id)?.location;
        match location {
            ElementLocation::Legacy { index } => Some(self.elements.remove(index)),
            ElementLocation::Section { index } => Some(self.sections.remove(index)),
            ElementLocation::Child { section, index } => self
                .sections
                .get_mut(section)
                .and_then(PortfolioElement::children_mut)
                .map(|children| children.remove(index)),
        }
    }

    /// Re-derive every child's `section_id` from containment.
    pub fn normalize_section_ids(&mut self) {
        for section in &mut self.sections {
            section.section_id = None;
            let section_id = section.id.clone();
            if let Some(children) = section.children_mut() {
                for child in children {
                    child.section_id = Some(section_id.clone());
                }
            }
        }
    }
}
