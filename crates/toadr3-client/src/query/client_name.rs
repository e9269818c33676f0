use super::{ParamValue, QueryArgs, QueryParameter, QueryParams};

/// `client_name`, passed through unchecked as `clientName`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientName;

pub const CLIENT_NAME: ClientName = ClientName;

impl QueryParameter for ClientName {
    fn check(&self, _errors: &mut Vec<String>, _args: &QueryArgs) {}

    fn create(&self, params: &mut QueryParams, args: &QueryArgs) {
        if let Some(client_name) = args.get("client_name") {
            params.insert("clientName", ParamValue::from_json(client_name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_name() {
        let args = QueryArgs::new().client_name("YAC");
        let mut errors = Vec::new();
        CLIENT_NAME.check(&mut errors, &args);
        assert!(errors.is_empty());

        let mut params = QueryParams::new();
        CLIENT_NAME.create(&mut params, &args);
        assert_eq!(params.get("clientName"), Some(&ParamValue::from("YAC")));
    }
}
