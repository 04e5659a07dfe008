//! Launch identity and the signed launch form.
//!
//! [`build_launch_form`] is pure: it describes the hidden form (fields,
//! action, target) and leaves DOM construction to a platform adapter.
//! [`LaunchForm::to_html`] is the adapter for contexts that serve markup
//! instead of scripting a live document.

use scorm_bridge_crypto::{ChecksumError, launch_checksum};
use serde::Serialize;

/// Logical name of the iframe that receives the launch response.
pub const DEFAULT_FRAME_NAME: &str = "scormContentFrame";

/// `id` given to the rendered form element.
pub const LAUNCH_FORM_ID: &str = "scormLaunchForm";

/// Inline style of the content iframe: full viewport, no border or margin.
pub const FRAME_STYLE: &str =
    "position:absolute;top:0;left:0;width:100vw;height:100vh;border:0;margin:0;padding:0;";

/// Identity carried by a launch request.
///
/// The checksum is computed in [`LaunchIdentity::sign`] and there is no way
/// to change an input without signing again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchIdentity {
    package_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_id: Option<String>,
    student_id: String,
    student_name: String,
    checksum: String,
}

impl LaunchIdentity {
    /// Build an identity and compute its checksum.
    pub fn sign(
        package_id: impl Into<String>,
        page_id: Option<String>,
        student_id: impl Into<String>,
        student_name: impl Into<String>,
    ) -> Result<Self, ChecksumError> {
        let package_id = package_id.into();
        let student_id = student_id.into();
        let student_name = student_name.into();
        let checksum = launch_checksum(&package_id, &student_id, &student_name)?;

        Ok(Self { package_id, page_id, student_id, student_name, checksum })
    }

    /// Content package being launched.
    pub fn package_id(&self) -> &str {
        &self.package_id
    }

    /// Page to open inside the package, if the host asked for one.
    pub fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref()
    }

    /// Learner ID reported by the host API.
    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    /// Learner name reported by the host API.
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    /// Base64 HMAC-SHA1 over `student_id|student_name`, keyed by package.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

/// The iframe the launch form targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchFrame {
    name: String,
}

impl LaunchFrame {
    /// A frame with the given name (used as both `name` and `id`).
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Frame name and id.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inline style for the frame element.
    pub fn style(&self) -> &'static str {
        FRAME_STYLE
    }
}

impl Default for LaunchFrame {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_NAME)
    }
}

/// One hidden input of the launch form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Input name.
    pub name: &'static str,
    /// Input value.
    pub value: String,
}

/// Description of the hidden form that starts the content session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchForm {
    /// Launch URL the form posts to.
    pub action: String,
    /// Always `POST`.
    pub method: &'static str,
    /// Name of the frame that receives the response.
    pub target: String,
    /// Hidden inputs, in submission order.
    pub fields: Vec<FormField>,
}

impl LaunchForm {
    /// Value of the named field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value.as_str())
    }

    /// Field names in submission order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Render the content frame and an auto-submitting hidden form.
    pub fn to_html(&self, frame: &LaunchFrame) -> String {
        let mut html = String::new();
        let name = escape_attr(frame.name());

        html.push_str(&format!(
            "<iframe name=\"{name}\" id=\"{name}\" style=\"{}\" frameborder=\"0\"></iframe>\n",
            frame.style()
        ));
        html.push_str(&format!(
            "<form id=\"{LAUNCH_FORM_ID}\" method=\"{}\" action=\"{}\" target=\"{}\" style=\"display:none\">\n",
            self.method,
            escape_attr(&self.action),
            escape_attr(&self.target),
        ));
        for field in &self.fields {
            html.push_str(&format!(
                "  <input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                field.name,
                escape_attr(&field.value)
            ));
        }
        html.push_str("</form>\n");
        html.push_str(&format!(
            "<script>document.getElementById(\"{LAUNCH_FORM_ID}\").submit();</script>\n"
        ));
        html
    }
}

/// Describe the launch form for `identity`.
///
/// `pageId` is only included when the identity carries one.
pub fn build_launch_form(
    identity: &LaunchIdentity,
    launch_url: &str,
    frame: &LaunchFrame,
) -> LaunchForm {
    let mut fields = Vec::with_capacity(5);
    fields.push(FormField { name: "packageId", value: identity.package_id.clone() });
    if let Some(page_id) = &identity.page_id {
        fields.push(FormField { name: "pageId", value: page_id.clone() });
    }
    fields.push(FormField { name: "studentId", value: identity.student_id.clone() });
    fields.push(FormField { name: "studentName", value: identity.student_name.clone() });
    fields.push(FormField { name: "checksum", value: identity.checksum.clone() });

    LaunchForm {
        action: launch_url.to_string(),
        method: "POST",
        target: frame.name().to_string(),
        fields,
    }
}

fn escape_attr(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LAUNCH_URL: &str = "https://lms.example/launch";

    fn identity(page_id: Option<&str>) -> LaunchIdentity {
        LaunchIdentity::sign("pkg-1", page_id.map(str::to_string), "42", "Jane Doe").unwrap()
    }

    #[test]
    fn sign_computes_checksum() {
        let identity = identity(None);
        assert_eq!(identity.checksum(), "ZsiiiWnOWe/kp8dKf1ktfPDghS4=");
        assert_eq!(identity.package_id(), "pkg-1");
        assert_eq!(identity.student_id(), "42");
        assert_eq!(identity.student_name(), "Jane Doe");
        assert_eq!(identity.page_id(), None);
    }

    #[test]
    fn page_id_does_not_affect_checksum() {
        assert_eq!(identity(None).checksum(), identity(Some("p-9")).checksum());
    }

    #[test]
    fn form_without_page_id() {
        let form = build_launch_form(&identity(None), LAUNCH_URL, &LaunchFrame::default());

        assert_eq!(form.action, LAUNCH_URL);
        assert_eq!(form.method, "POST");
        assert_eq!(form.target, DEFAULT_FRAME_NAME);
        assert_eq!(
            form.field_names().collect::<Vec<_>>(),
            ["packageId", "studentId", "studentName", "checksum"]
        );
        assert_eq!(form.field("pageId"), None);
        assert_eq!(form.field("checksum"), Some("ZsiiiWnOWe/kp8dKf1ktfPDghS4="));
    }

    #[test]
    fn form_with_page_id() {
        let form = build_launch_form(&identity(Some("p-9")), LAUNCH_URL, &LaunchFrame::new("f"));

        assert_eq!(form.target, "f");
        assert_eq!(
            form.field_names().collect::<Vec<_>>(),
            ["packageId", "pageId", "studentId", "studentName", "checksum"]
        );
        assert_eq!(form.field("pageId"), Some("p-9"));
    }

    #[test]
    fn html_escapes_values() {
        let identity =
            LaunchIdentity::sign("pkg-1", None, "42", "O'Neil \"<b>\" & co").unwrap();
        let frame = LaunchFrame::default();
        let html = build_launch_form(&identity, LAUNCH_URL, &frame).to_html(&frame);

        assert!(html.contains("value=\"O&#39;Neil &quot;&lt;b&gt;&quot; &amp; co\""));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn html_targets_named_full_viewport_frame() {
        let frame = LaunchFrame::default();
        let html = build_launch_form(&identity(None), LAUNCH_URL, &frame).to_html(&frame);

        assert!(html.contains(&format!("<iframe name=\"{DEFAULT_FRAME_NAME}\"")));
        assert!(html.contains(&format!("target=\"{DEFAULT_FRAME_NAME}\"")));
        assert!(html.contains("width:100vw;height:100vh;border:0;margin:0"));
        assert!(html.contains(&format!("action=\"{LAUNCH_URL}\"")));
        assert!(html.contains(".submit();"));
    }

    #[test]
    fn identity_serializes_camel_case() {
        let value = serde_json::to_value(identity(Some("p-9"))).unwrap();
        assert_eq!(value["packageId"], "pkg-1");
        assert_eq!(value["pageId"], "p-9");
        assert_eq!(value["studentName"], "Jane Doe");
    }
}
