pub mod scenarios;
pub mod templates;

pub use scenarios::{
    detailed_scenario,
    detailed_scenarios,
    resource_name,
    scenario_sentence,
    scenario_sentences,
    TestScenario,
};

pub use templates::{
    api_test_context,
    RenderError,
    TemplateStore,
    API_TEST_TEMPLATE,
    UI_TEST_TEMPLATE,
};
