use crate::config::Expectations;
use crate::helm::Rendered;
use crate::results::TestResult;

/// Patterns from `wanted` that do not occur in `rendered`, labelled for reporting
fn missing<I>(rendered: &str, wanted: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    wanted
        .into_iter()
        .filter(|(_, pattern)| !rendered.contains(pattern.as_str()))
        .map(|(label, _)| label)
        .collect()
}

/// Pass with `ok`, or fail listing what was missing after `prefix`
fn verdict(name: &str, ok: &str, prefix: &str, missed: Vec<String>) -> TestResult {
    if missed.is_empty() {
        TestResult::pass(name, ok)
    } else {
        TestResult::fail(name, format!("{}: {}", prefix, missed.join(", ")))
            .with_details(json!({ "missing": missed }))
    }
}

pub fn chart_rendering(render: &Rendered) -> TestResult {
    match render {
        Rendered::Ok(_) => TestResult::pass("Chart Rendering", "Chart renders successfully"),
        Rendered::Failed(err) => {
            TestResult::fail("Chart Rendering", format!("Chart rendering failed: {}", err))
        }
    }
}

pub fn custom_values_rendering(render: &Rendered) -> TestResult {
    match render {
        Rendered::Ok(_) => TestResult::pass("Custom Values Rendering", "Custom values render successfully"),
        Rendered::Failed(err) => TestResult::fail(
            "Custom Values Rendering",
            format!("Custom values rendering failed: {}", err),
        ),
    }
}

/// Every required kind appears as `kind: {kind}`
pub fn required_resources(rendered: &str, exp: &Expectations) -> TestResult {
    let wanted = exp.requiredKinds.iter().map(|k| (k.clone(), format!("kind: {}", k)));
    verdict(
        "Required Resources",
        "All required resources found",
        "Missing resources",
        missing(rendered, wanted),
    )
}

/// Every named resource appears as `name: {name}`
pub fn specific_resources(rendered: &str, exp: &Expectations) -> TestResult {
    let wanted = exp.resourceNames.iter().map(|n| (n.clone(), format!("name: {}", n)));
    verdict(
        "Specific Resources",
        "All specific resources found",
        "Missing resources",
        missing(rendered, wanted),
    )
}

/// At least one resource is placed in the expected namespace
pub fn namespace_consistency(rendered: &str, exp: &Expectations) -> TestResult {
    let name = "Namespace Consistency";
    let pattern = format!("namespace: {}", exp.namespace);
    let count = rendered.matches(pattern.as_str()).count();
    let res = if count > 0 {
        TestResult::pass(name, format!("Found {} resources with correct namespace", count))
    } else {
        TestResult::fail(name, "No resources found with correct namespace")
    };
    res.with_details(json!({ "count": count }))
}

/// The custom values render switched namespace
pub fn custom_namespace(rendered_custom: &str, exp: &Expectations) -> TestResult {
    let name = "Custom Namespace";
    if rendered_custom.contains(&format!("namespace: {}", exp.customNamespace)) {
        TestResult::pass(name, "Custom namespace applied correctly")
    } else {
        TestResult::fail(name, "Custom namespace not applied")
    }
}

pub fn service_selectors(rendered: &str, exp: &Expectations) -> TestResult {
    let wanted = exp.selectors.iter().map(|svc| {
        let sel = format!("app: {}", svc);
        (format!("{} ({})", svc, sel), sel)
    });
    verdict(
        "Service Selectors",
        "All service selectors correct",
        "Missing selectors",
        missing(rendered, wanted),
    )
}

pub fn image_references(rendered: &str, exp: &Expectations) -> TestResult {
    let wanted = exp.images.iter().map(|i| (i.clone(), i.clone()));
    verdict(
        "Image References",
        "All image references correct",
        "Missing images",
        missing(rendered, wanted),
    )
}

pub fn port_configurations(rendered: &str, exp: &Expectations) -> TestResult {
    let wanted = exp
        .ports
        .iter()
        .map(|p| (format!("{}:{}", p.service, p.port), format!("port: {}", p.port)));
    verdict(
        "Port Configurations",
        "All port configurations correct",
        "Missing ports",
        missing(rendered, wanted),
    )
}

pub fn environment_variables(rendered: &str, exp: &Expectations) -> TestResult {
    let wanted = exp.envVars.iter().map(|e| (e.clone(), e.clone()));
    verdict(
        "Environment Variables",
        "All environment variables set",
        "Missing env vars",
        missing(rendered, wanted),
    )
}
