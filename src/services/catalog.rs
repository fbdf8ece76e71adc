//! API documentation explorer: the gateway endpoints, their parameters and
//! example responses.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleResponse {
    pub status: u16,
    pub description: &'static str,
    pub example: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub id: &'static str,
    pub path: &'static str,
    pub method: HttpMethod,
    pub summary: &'static str,
    pub description: &'static str,
    pub parameters: &'static [Parameter],
    pub responses: &'static [ExampleResponse],
    pub requires_auth: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointGroup {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub endpoints: &'static [Endpoint],
}

pub const AUTH_HEADER_EXAMPLE: &str = "Authorization: Bearer YOUR_JWT_TOKEN";

static USE_CASE_PARAMS: [Parameter; 2] = [
    Parameter {
        name: "text",
        kind: "string",
        required: true,
        description: "The use case scenario description",
    },
    Parameter {
        name: "file",
        kind: "file",
        required: false,
        description: "Supporting document (PDF, DOCX, XLSX)",
    },
];

static STANDARDS_PARAMS: [Parameter; 2] = [
    Parameter {
        name: "text",
        kind: "string",
        required: true,
        description: "The standards-related query",
    },
    Parameter {
        name: "file",
        kind: "file",
        required: false,
        description: "Supporting document (PDF, DOCX, XLSX)",
    },
];

static FRAUD_PARAMS: [Parameter; 2] = [
    Parameter {
        name: "text",
        kind: "string",
        required: true,
        description: "The fraud scenario description",
    },
    Parameter {
        name: "file",
        kind: "file",
        required: false,
        description: "Supporting document (PDF, DOCX, XLSX)",
    },
];

static JOURNAL_PARAMS: [Parameter; 2] = [
    Parameter {
        name: "entries",
        kind: "array",
        required: true,
        description: "Array of journal entries to analyze",
    },
    Parameter {
        name: "description",
        kind: "string",
        required: false,
        description: "Optional description of the transaction",
    },
];

static USE_CASE_RESPONSES: [ExampleResponse; 2] = [
    ExampleResponse {
        status: 200,
        description: "Successful response",
        example: r#"{
  "analysis": "Detailed analysis of the use case",
  "recommendations": ["Recommendation 1", "Recommendation 2"],
  "standards": ["FAS 1", "FAS 2"],
  "journal_entries": [
    {
      "account": "Account Name",
      "debit": 1000,
      "credit": 0
    }
  ],
  "implementation_steps": [
    {
      "step": 1,
      "description": "Step description",
      "standard_reference": "FAS 1"
    }
  ]
}"#,
    },
    ExampleResponse {
        status: 401,
        description: "Unauthorized",
        example: r#"{
  "message": "Your session has expired. Please log in again."
}"#,
    },
];

static JOURNAL_RESPONSES: [ExampleResponse; 2] = [
    ExampleResponse {
        status: 200,
        description: "Successful response",
        example: r#"{
  "transaction_type": "Identified transaction type",
  "confidence_score": 0.95,
  "applicable_standards": ["FAS 1", "FAS 2"],
  "analysis": "Detailed analysis of the transaction",
  "recommendations": ["Recommendation 1", "Recommendation 2"],
  "standard_compliance": {
    "compliant": true,
    "issues": [],
    "suggestions": []
  }
}"#,
    },
    ExampleResponse {
        status: 400,
        description: "Bad Request",
        example: r#"{
  "message": "Invalid request format or missing required fields",
  "details": {
    "field": "entries",
    "error": "At least one journal entry is required"
  }
}"#,
    },
];

static STANDARDS_RESPONSES: [ExampleResponse; 1] = [ExampleResponse {
    status: 200,
    description: "Successful response",
    example: r#"{
  "analysis": "Detailed analysis of the standards query",
  "recommendations": ["Recommendation 1", "Recommendation 2"],
  "applicable_standards": ["FAS 1", "FAS 2"],
  "implementation_guidance": "Guidance on implementing the standards",
  "standard_updates": [
    {
      "standard": "FAS 1",
      "update_type": "Clarification",
      "description": "Description of the update"
    }
  ]
}"#,
}];

static FRAUD_RESPONSES: [ExampleResponse; 1] = [ExampleResponse {
    status: 200,
    description: "Successful response",
    example: r#"{
  "risk_assessment": "Detailed risk assessment",
  "risk_level": "HIGH",
  "recommendations": ["Recommendation 1", "Recommendation 2"],
  "applicable_standards": ["FAS 1", "FAS 2"],
  "mitigation_strategies": ["Strategy 1", "Strategy 2"],
  "compliance_issues": [
    {
      "standard": "FAS 1",
      "issue": "Description of the compliance issue",
      "severity": "HIGH"
    }
  ]
}"#,
}];

static USE_CASE_ENDPOINTS: [Endpoint; 1] = [Endpoint {
    id: "analyze-use-case",
    path: "/gateway/service1",
    method: HttpMethod::Post,
    summary: "Analyze use case scenario",
    description: "Analyzes a use case scenario and provides accounting guidance based on AAOIFI standards.",
    parameters: &USE_CASE_PARAMS,
    responses: &USE_CASE_RESPONSES,
    requires_auth: true,
}];

static JOURNAL_ENDPOINTS: [Endpoint; 1] = [Endpoint {
    id: "analyze-transaction",
    path: "/gateway/service2",
    method: HttpMethod::Post,
    summary: "Analyze journal entries",
    description: "Analyzes journal entries to identify the underlying transaction type and applicable AAOIFI standards.",
    parameters: &JOURNAL_PARAMS,
    responses: &JOURNAL_RESPONSES,
    requires_auth: true,
}];

static STANDARDS_ENDPOINTS: [Endpoint; 1] = [Endpoint {
    id: "analyze-standards",
    path: "/gateway/service3",
    method: HttpMethod::Post,
    summary: "Analyze standards query",
    description: "Analyzes standards-related queries and provides guidance on AAOIFI standards enhancements.",
    parameters: &STANDARDS_PARAMS,
    responses: &STANDARDS_RESPONSES,
    requires_auth: true,
}];

static FRAUD_ENDPOINTS: [Endpoint; 1] = [Endpoint {
    id: "analyze-fraud",
    path: "/gateway/service4",
    method: HttpMethod::Post,
    summary: "Analyze fraud scenario",
    description: "Analyzes financial fraud scenarios and provides risk assessment based on AAOIFI standards.",
    parameters: &FRAUD_PARAMS,
    responses: &FRAUD_RESPONSES,
    requires_auth: true,
}];

pub static ENDPOINT_GROUPS: [EndpointGroup; 4] = [
    EndpointGroup {
        id: "use-cases",
        name: "Use Case Scenario Analysis",
        description: "Endpoints for analyzing use case scenarios and providing accounting guidance based on AAOIFI standards",
        endpoints: &USE_CASE_ENDPOINTS,
    },
    EndpointGroup {
        id: "reverse-transactions",
        name: "Reverse Transaction Analysis",
        description: "Endpoints for analyzing journal entries to identify transaction types and applicable standards",
        endpoints: &JOURNAL_ENDPOINTS,
    },
    EndpointGroup {
        id: "standards",
        name: "Standards Enhancement Analysis",
        description: "Endpoints for analyzing standards-related queries and providing guidance on enhancements",
        endpoints: &STANDARDS_ENDPOINTS,
    },
    EndpointGroup {
        id: "finfraud",
        name: "FinFraud Shield Analysis",
        description: "Endpoints for analyzing financial fraud scenarios and providing risk assessment",
        endpoints: &FRAUD_ENDPOINTS,
    },
];

pub fn groups() -> &'static [EndpointGroup] {
    &ENDPOINT_GROUPS
}

pub fn find_group(id: &str) -> Option<&'static EndpointGroup> {
    ENDPOINT_GROUPS
        .iter()
        .find(|g| g.id.eq_ignore_ascii_case(id.trim()))
}

pub fn find_endpoint(id: &str) -> Option<&'static Endpoint> {
    ENDPOINT_GROUPS
        .iter()
        .flat_map(|g| g.endpoints.iter())
        .find(|e| e.id.eq_ignore_ascii_case(id.trim()))
}

/// Example body for an endpoint: the given status, or the first 2xx one.
pub fn example_response(endpoint_id: &str, status: Option<u16>) -> Result<&'static str, String> {
    let endpoint =
        find_endpoint(endpoint_id).ok_or_else(|| format!("Unknown endpoint: {}", endpoint_id))?;
    let found = match status {
        Some(status) => endpoint.responses.iter().find(|r| r.status == status),
        None => endpoint
            .responses
            .iter()
            .find(|r| (200..300).contains(&r.status)),
    };
    found.map(|r| r.example).ok_or_else(|| match status {
        Some(status) => format!("No {} response defined for this endpoint", status),
        None => "No success response defined for this endpoint".to_string(),
    })
}
