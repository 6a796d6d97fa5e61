//! WCAG classification of Lighthouse accessibility rules.
//!
//! Tables are built once at startup and shared read-only across requests
//! (see `ServerDeps::classifier`).

use std::collections::HashMap;

use super::models::WcagLevel::{A, AA, AAA};
use super::models::WcagPrinciple::{Operable, Perceivable, Robust, Understandable};
use super::models::{Severity, WcagLevel, WcagPrinciple};

/// WCAG success criterion a rule maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WcagInfo {
    pub criterion: &'static str,
    pub name: &'static str,
    pub level: WcagLevel,
    pub principle: WcagPrinciple,
}

pub const GENERIC_REMEDIATION: &str =
    "Review the element and ensure it meets WCAG accessibility guidelines.";

const fn info(
    criterion: &'static str,
    name: &'static str,
    level: WcagLevel,
    principle: WcagPrinciple,
) -> WcagInfo {
    WcagInfo {
        criterion,
        name,
        level,
        principle,
    }
}

const NON_TEXT: WcagInfo = info("1.1.1", "Non-text Content", A, Perceivable);
const INFO_RELATIONSHIPS: WcagInfo = info("1.3.1", "Info and Relationships", A, Perceivable);
const NAME_ROLE_VALUE: WcagInfo = info("4.1.2", "Name, Role, Value", A, Robust);
const LANGUAGE_OF_PAGE: WcagInfo = info("3.1.1", "Language of Page", A, Understandable);
const BYPASS_BLOCKS: WcagInfo = info("2.4.1", "Bypass Blocks", A, Operable);
const FOCUS_ORDER: WcagInfo = info("2.4.3", "Focus Order", A, Operable);

const WCAG_TABLE: &[(&str, WcagInfo)] = &[
    ("color-contrast", info("1.4.3", "Contrast (Minimum)", AA, Perceivable)),
    ("image-alt", NON_TEXT),
    ("link-name", info("2.4.4", "Link Purpose (In Context)", A, Operable)),
    ("button-name", NAME_ROLE_VALUE),
    ("input-image-alt", NON_TEXT),
    ("label", INFO_RELATIONSHIPS),
    ("html-has-lang", LANGUAGE_OF_PAGE),
    ("html-lang-valid", LANGUAGE_OF_PAGE),
    ("valid-lang", info("3.1.2", "Language of Parts", AA, Understandable)),
    ("meta-viewport", info("1.4.4", "Resize Text", AA, Perceivable)),
    ("document-title", info("2.4.2", "Page Titled", A, Operable)),
    ("heading-order", INFO_RELATIONSHIPS),
    ("bypass", BYPASS_BLOCKS),
    ("frame-title", NAME_ROLE_VALUE),
    ("aria-allowed-attr", NAME_ROLE_VALUE),
    ("aria-hidden-body", NAME_ROLE_VALUE),
    ("aria-hidden-focus", NAME_ROLE_VALUE),
    ("aria-required-attr", NAME_ROLE_VALUE),
    ("aria-required-children", NAME_ROLE_VALUE),
    ("aria-required-parent", NAME_ROLE_VALUE),
    ("aria-roles", NAME_ROLE_VALUE),
    ("aria-valid-attr-value", NAME_ROLE_VALUE),
    ("aria-valid-attr", NAME_ROLE_VALUE),
    ("duplicate-id-aria", info("4.1.1", "Parsing", A, Robust)),
    ("form-field-multiple-labels", INFO_RELATIONSHIPS),
    ("list", INFO_RELATIONSHIPS),
    ("listitem", INFO_RELATIONSHIPS),
    ("definition-list", INFO_RELATIONSHIPS),
    ("dlitem", INFO_RELATIONSHIPS),
    ("tabindex", FOCUS_ORDER),
    ("accesskeys", BYPASS_BLOCKS),
    ("focus-traps", info("2.1.2", "No Keyboard Trap", A, Operable)),
    ("focusable-controls", info("2.1.1", "Keyboard", A, Operable)),
    ("interactive-element-affordance", info("2.4.7", "Focus Visible", AA, Operable)),
    ("logical-tab-order", FOCUS_ORDER),
    ("managed-focus", FOCUS_ORDER),
    ("offscreen-content-hidden", FOCUS_ORDER),
    ("use-landmarks", INFO_RELATIONSHIPS),
    ("visual-order-follows-dom", info("1.3.2", "Meaningful Sequence", A, Perceivable)),
    ("td-headers-attr", INFO_RELATIONSHIPS),
    ("th-has-data-cells", INFO_RELATIONSHIPS),
    ("video-caption", info("1.2.2", "Captions (Prerecorded)", A, Perceivable)),
    ("audio-caption", info("1.2.1", "Audio-only and Video-only", A, Perceivable)),
    ("object-alt", NON_TEXT),
    ("target-size", info("2.5.5", "Target Size", AAA, Operable)),
];

const REMEDIATIONS: &[(&str, &str)] = &[
    ("color-contrast", "Increase the contrast ratio between text and background colors to at least 4.5:1 for normal text."),
    ("image-alt", "Add descriptive alt text to images that convey meaning. Use empty alt=\"\" for decorative images."),
    ("link-name", "Ensure all links have discernible text that describes their destination or purpose."),
    ("button-name", "Add text content or aria-label to buttons so screen readers can announce their purpose."),
    ("label", "Associate form inputs with labels using the 'for' attribute or by wrapping inputs in label elements."),
    ("html-has-lang", "Add a lang attribute to the <html> element (e.g., lang=\"en\")."),
    ("html-lang-valid", "Use a valid BCP 47 language code in the lang attribute."),
    ("document-title", "Add a descriptive <title> element to the page that summarizes its content."),
    ("heading-order", "Structure headings in a logical order (h1, then h2, then h3, etc.) without skipping levels."),
    ("bypass", "Add a 'Skip to main content' link at the beginning of the page."),
    ("frame-title", "Add title attributes to iframe elements that describe their content."),
    ("meta-viewport", "Remove user-scalable=no from the viewport meta tag to allow zooming."),
    ("aria-allowed-attr", "Only use ARIA attributes that are valid for the element's role."),
    ("aria-hidden-body", "Remove aria-hidden from the body element or its ancestors."),
    ("aria-hidden-focus", "Ensure elements with aria-hidden=\"true\" don't contain focusable elements."),
    ("aria-required-attr", "Add all required ARIA attributes for the element's role."),
    ("aria-required-children", "Ensure ARIA parent roles contain their required child roles."),
    ("aria-required-parent", "Ensure ARIA child roles are contained within required parent roles."),
    ("aria-roles", "Use valid ARIA role values."),
    ("aria-valid-attr-value", "Use valid values for ARIA attributes."),
    ("aria-valid-attr", "Use valid ARIA attribute names."),
    ("tabindex", "Avoid using tabindex values greater than 0."),
    ("duplicate-id-aria", "Ensure all IDs used in ARIA attributes are unique."),
    ("video-caption", "Add captions to video elements for deaf or hard-of-hearing users."),
    ("td-headers-attr", "Ensure table cells reference valid header cells using the headers attribute."),
    ("th-has-data-cells", "Ensure table header cells are associated with data cells."),
];

/// Immutable lookup tables from rule id to WCAG mapping and remediation hint.
#[derive(Debug, Clone)]
pub struct WcagClassifier {
    criteria: HashMap<&'static str, WcagInfo>,
    remediations: HashMap<&'static str, &'static str>,
}

impl WcagClassifier {
    pub fn new() -> Self {
        Self {
            criteria: WCAG_TABLE.iter().copied().collect(),
            remediations: REMEDIATIONS.iter().copied().collect(),
        }
    }

    pub fn classify(&self, rule_id: &str) -> Option<&WcagInfo> {
        self.criteria.get(rule_id)
    }

    /// Rule-specific fix, or the generic hint for unknown rules.
    pub fn remediation(&self, rule_id: &str) -> &'static str {
        self.remediations
            .get(rule_id)
            .copied()
            .unwrap_or(GENERIC_REMEDIATION)
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

impl Default for WcagClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Severity from a raw Lighthouse score in [0, 1] and the number of affected
/// elements. Hard failures escalate with the element count.
pub fn severity(raw_score: Option<f64>, item_count: usize) -> Severity {
    match raw_score {
        None => failed_severity(item_count),
        Some(score) if score == 0.0 => failed_severity(item_count),
        Some(score) if score < 0.5 => Severity::High,
        Some(score) if score < 0.9 => Severity::Medium,
        Some(_) => Severity::Low,
    }
}

fn failed_severity(item_count: usize) -> Severity {
    if item_count > 10 {
        Severity::Critical
    } else if item_count > 5 {
        Severity::High
    } else {
        Severity::Medium
    }
}
