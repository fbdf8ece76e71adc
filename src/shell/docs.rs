use anyhow::{Result, anyhow};

use crate::services::catalog::{self, AUTH_HEADER_EXAMPLE, Endpoint, EndpointGroup};

pub(crate) fn show(group: Option<&str>, endpoint: Option<&str>, status: Option<u16>) -> Result<()> {
    if let Some(endpoint_id) = endpoint {
        let body = catalog::example_response(endpoint_id, status).map_err(|e| anyhow!(e))?;
        println!("{body}");
        return Ok(());
    }

    match group {
        None => {
            println!("Authentication: {AUTH_HEADER_EXAMPLE}");
            println!();
            for group in catalog::groups() {
                println!("{:<22} {}", group.id, group.name);
                for endpoint in group.endpoints {
                    println!(
                        "  {:<6} {:<20} {}",
                        endpoint.method.as_str(),
                        endpoint.path,
                        endpoint.summary
                    );
                }
            }
        }
        Some(id) => {
            let group = catalog::find_group(id).ok_or_else(|| anyhow!("Unknown group: {id}"))?;
            print_group(group);
        }
    }
    Ok(())
}

fn print_group(group: &EndpointGroup) {
    println!("{}", group.name);
    println!("{}", group.description);
    for endpoint in group.endpoints {
        println!();
        print_endpoint(endpoint);
    }
}

fn print_endpoint(endpoint: &Endpoint) {
    println!(
        "{} {}  [{}]",
        endpoint.method.as_str(),
        endpoint.path,
        endpoint.id
    );
    println!("  {}", endpoint.description);
    if endpoint.requires_auth {
        println!("  Requires: {AUTH_HEADER_EXAMPLE}");
    }

    println!("  Parameters:");
    for param in endpoint.parameters {
        let required = if param.required { "required" } else { "optional" };
        println!(
            "    {:<12} {:<7} {:<9} {}",
            param.name, param.kind, required, param.description
        );
    }

    println!("  Responses:");
    for response in endpoint.responses {
        println!("    {} {}", response.status, response.description);
    }
}
