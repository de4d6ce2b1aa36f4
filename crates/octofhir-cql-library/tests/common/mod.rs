//! Shared scope trees for library resolution tests

#![allow(dead_code)]

use octofhir_cql_library::*;

/// Two levels below the measure: `Measure -> Globals -> Common`
pub fn common() -> LibraryScope {
    LibraryScopeBuilder::new("Common", "2.0.000")
        .add_definition(Definition::new(
            "c1",
            "Deep Definition",
            "define \"Deep Definition\":\n  true",
        ))
        .and_then(|b| {
            b.add_function(Definition::function("c2", "DeepFn", "define function DeepFn():\n  1"))
        })
        .and_then(|b| b.add_code(CodeRef::new("Deep Code", "deep", "CS")))
        .and_then(|b| b.add_value_set(ValueSetRef::new("Deep Value Set", "2.16.840.1.0")))
        .unwrap_or_else(|e| panic!("Failed to build Common: {}", e))
        .build()
}

/// Directly included as `Global`
pub fn globals() -> LibraryScope {
    LibraryScopeBuilder::new("Globals", "1.0.000")
        .using("QI-Core", "4.1.1")
        .add_definition(Definition::new(
            "g1",
            "Inpatient Encounters",
            "define \"Inpatient Encounters\":\n  [Encounter: \"Inpatient Encounter\"]",
        ))
        .and_then(|b| {
            b.add_function(Definition::function(
                "g2",
                "Normalize Interval",
                "define function \"Normalize Interval\"(choice Choice<DateTime, Period>):\n  null",
            ))
        })
        .and_then(|b| {
            b.add_parameter(Parameter::new("Measurement Period").with_type("Interval<DateTime>"))
        })
        .and_then(|b| {
            b.add_value_set(ValueSetRef::new(
                "Inpatient Encounter",
                "2.16.840.1.113883.3.666.5.307",
            ))
        })
        .and_then(|b| b.add_code(CodeRef::new("Active", "active", "ConditionClinicalStatusCodes")))
        .and_then(|b| {
            b.add_code(
                CodeRef::new("73211009", "73211009", "SNOMEDCT")
                    .with_display_name("Diabetes")
                    .with_code_system_version("2023-03"),
            )
        })
        .and_then(|b| b.add_code_system(CodeSystemRef::new("SNOMEDCT", "http://snomed.info/sct")))
        .and_then(|b| b.include(IncludeKey::new("Common", "Common", "2.0.000"), common()))
        .unwrap_or_else(|e| panic!("Failed to build Globals: {}", e))
        .build()
}

/// Directly included as `FHIRHelpers`
pub fn fhir_helpers() -> LibraryScope {
    LibraryScopeBuilder::new("FHIRHelpers", "4.0.001")
        .using("FHIR", "4.0.1")
        .add_function(Definition::function(
            "h1",
            "ToInterval",
            "define function ToInterval(period FHIR.Period):\n  \
             Interval[period.\"start\".value, period.\"end\".value]",
        ))
        .and_then(|b| {
            b.add_function(Definition::function(
                "h2",
                "ToString",
                "define function ToString(value FHIR.string):\n  value.value",
            ))
        })
        .unwrap_or_else(|e| panic!("Failed to build FHIRHelpers: {}", e))
        .build()
}

/// A measure library with two direct includes and local symbols of every kind
pub fn measure() -> LibraryScope {
    LibraryScopeBuilder::new("Measure", "1.0.000")
        .using("QI-Core", "4.1.1")
        .context("Patient")
        .line_count(42)
        .add_definition(Definition::new(
            "m1",
            "Initial Population",
            "define \"Initial Population\":\n  exists Global.\"Inpatient Encounters\"",
        ))
        .and_then(|b| {
            b.add_definition(Definition::new(
                "m2",
                "Denominator",
                "define \"Denominator\":\n  \"Initial Population\"",
            ))
        })
        .and_then(|b| {
            b.add_function(Definition::function(
                "m3",
                "Local Helper",
                "define function \"Local Helper\"():\n  1",
            ))
        })
        .and_then(|b| {
            b.add_parameter(Parameter::new("Measurement Period").with_type("Interval<DateTime>"))
        })
        .and_then(|b| {
            b.add_value_set(ValueSetRef::new(
                "Office Visit",
                "2.16.840.1.113883.3.464.1003.101.12.1001",
            ))
        })
        .and_then(|b| b.add_code(CodeRef::new("Birth date", "21112-8", "LOINC")))
        .and_then(|b| b.include(IncludeKey::new("Global", "Globals", "1.0.000"), globals()))
        .and_then(|b| {
            b.include(IncludeKey::new("FHIRHelpers", "FHIRHelpers", "4.0.001"), fhir_helpers())
        })
        .unwrap_or_else(|e| panic!("Failed to build Measure: {}", e))
        .build()
}
