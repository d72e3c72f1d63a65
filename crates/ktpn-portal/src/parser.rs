//! Result page parsing.
//!
//! The result page lists violations inside a single container. Each
//! violation is a run of labeled rows closed by an `<hr>`:
//!
//! ```html
//! <div id="bodyPrint123" class="form-horizontal">
//!   <div class="form-group">
//!     <label class="col-md-3"><span>Biển kiểm soát:</span></label>
//!     <div class="col-md-9">29A12345</div>
//!   </div>
//!   ...
//!   <hr>
//! </div>
//! ```

use crate::error::{PortalError, Result};
use crate::violation::Violation;
use scraper::{ElementRef, Html, Selector};

const CONTAINER_SELECTOR: &str = "#bodyPrint123.form-horizontal";
const LABEL_SELECTOR: &str = "span";
const VALUE_SELECTOR: &str = ".col-md-9";
const EMPHASIS_VALUE_SELECTOR: &str = ".col-md-9 > span";

/// Which sub-node of a row holds the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueNode {
    /// The value cell itself
    Plain,
    /// A `span` nested directly in the value cell
    Emphasis,
}

type FieldSetter = fn(&mut Violation, String);

/// Maps a row label to the accumulator field it fills.
struct LabelRule {
    label: &'static str,
    value: ValueNode,
    apply: FieldSetter,
}

/// Labels as the portal renders them, byte for byte (trailing spaces included).
///
/// The plate number row starts a new record, so it replaces the accumulator
/// instead of setting a single field.
const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        label: "Biển kiểm soát:",
        value: ValueNode::Plain,
        apply: |v, s| {
            *v = Violation {
                plate_number: s,
                ..Violation::default()
            };
        },
    },
    LabelRule {
        label: "Màu biển:",
        value: ValueNode::Plain,
        apply: |v, s| v.plate_color = s,
    },
    LabelRule {
        label: "Loại phương tiện:",
        value: ValueNode::Plain,
        apply: |v, s| v.vehicle_type = s,
    },
    LabelRule {
        label: "Thời gian vi phạm: ",
        value: ValueNode::Plain,
        apply: |v, s| v.date = s,
    },
    LabelRule {
        label: "Địa điểm vi phạm:",
        value: ValueNode::Plain,
        apply: |v, s| v.location = s,
    },
    LabelRule {
        label: "Hành vi vi phạm:",
        value: ValueNode::Plain,
        apply: |v, s| v.reason = s,
    },
    LabelRule {
        label: "Trạng thái: ",
        value: ValueNode::Emphasis,
        apply: |v, s| v.status = s,
    },
    LabelRule {
        label: "Đơn vị phát hiện vi phạm: ",
        value: ValueNode::Plain,
        apply: |v, s| v.traffic_enforcement = s,
    },
];

/// Extracts violation records from result page HTML.
pub struct ViolationParser {
    container: Selector,
    label: Selector,
    value: Selector,
    emphasis_value: Selector,
}

impl ViolationParser {
    /// Compile the selectors used to walk the result page.
    pub fn new() -> Result<Self> {
        Ok(Self {
            container: compile(CONTAINER_SELECTOR)?,
            label: compile(LABEL_SELECTOR)?,
            value: compile(VALUE_SELECTOR)?,
            emphasis_value: compile(EMPHASIS_VALUE_SELECTOR)?,
        })
    }

    /// Parse a result page into violations, in document order.
    ///
    /// A record is emitted each time an `<hr>` is reached; rows after the
    /// last `<hr>` of a container are not emitted. An empty list means the
    /// plate has no recorded violations.
    pub fn parse(&self, html: &[u8]) -> Result<Vec<Violation>> {
        let html = std::str::from_utf8(html)
            .map_err(|e| PortalError::decode("result page", e.to_string()))?;
        let document = Html::parse_document(html);

        let mut violations = Vec::new();

        for container in document.select(&self.container) {
            let mut current = Violation::default();

            for row in container.children().filter_map(ElementRef::wrap) {
                if row.value().name() == "hr" {
                    violations.push(current.clone());
                    continue;
                }
                self.apply_row(&row, &mut current)?;
            }
        }

        tracing::debug!("Extracted {} violation(s)", violations.len());
        Ok(violations)
    }

    fn apply_row(&self, row: &ElementRef, current: &mut Violation) -> Result<()> {
        let label = row
            .select(&self.label)
            .next()
            .map(|el| el.inner_html())
            .unwrap_or_default();

        let Some(rule) = LABEL_RULES.iter().find(|rule| rule.label == label) else {
            return Ok(());
        };

        let selector = match rule.value {
            ValueNode::Plain => &self.value,
            ValueNode::Emphasis => &self.emphasis_value,
        };
        let value = row.select(selector).next().ok_or_else(|| {
            PortalError::decode(
                "result page",
                format!("row {:?} has no value node", rule.label),
            )
        })?;

        (rule.apply)(current, value.inner_html());
        Ok(())
    }
}

/// Parse a result page with a freshly built [`ViolationParser`].
pub fn extract_violations(html: &[u8]) -> Result<Vec<Violation>> {
    ViolationParser::new()?.parse(html)
}

fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| PortalError::decode("selector", format!("{css}: {e}")))
}
