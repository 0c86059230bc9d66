//! Declarative macros for UPnP operation definitions
//!
//! Both macros take the same header: the operation name, SOAP action,
//! service, the fixed arguments every call carries (`InstanceID`,
//! `Channel`) and the request fields with their SOAP argument names. Fixed
//! arguments are sent first, then the fields in declaration order.
//!
//! Callers must have `paste::paste` in scope.

/// Define an operation whose response carries nothing of interest
///
/// # Example
/// ```rust,ignore
/// define_upnp_operation! {
///     operation: SeekOperation,
///     action: "Seek",
///     service: AVTransport,
///     fixed: { "InstanceID" => "0" },
///     request: {
///         unit: String => "Unit",
///         target: String => "Target",
///     },
/// }
/// ```
#[macro_export]
macro_rules! define_upnp_operation {
    (
        operation: $op_struct:ident,
        action: $action:literal,
        service: $service:ident,
        fixed: { $($fixed_name:literal => $fixed_value:literal),* $(,)? },
        request: {
            $($field:ident: $field_type:ty => $arg_name:literal),* $(,)?
        } $(,)?
    ) => {
        paste! {
            #[derive(serde::Serialize, Clone, Debug, PartialEq)]
            pub struct [<$op_struct Request>] {
                $(pub $field: $field_type,)*
            }

            pub struct $op_struct;

            impl $crate::operation::SonosOperation for $op_struct {
                type Request = [<$op_struct Request>];
                type Response = ();

                const SERVICE: $crate::service::Service = $crate::service::Service::$service;
                const ACTION: &'static str = $action;

                fn build_args(
                    request: &Self::Request,
                ) -> ::std::result::Result<::std::vec::Vec<(String, String)>, $crate::operation::ValidationError> {
                    $crate::operation::Validate::validate_basic(request)?;

                    #[allow(unused_mut)]
                    let mut args: ::std::vec::Vec<(String, String)> =
                        ::std::vec![$(($fixed_name.to_string(), $fixed_value.to_string())),*];
                    $(
                        args.push((
                            $arg_name.to_string(),
                            $crate::operation::ActionArg::to_arg(&request.$field),
                        ));
                    )*
                    Ok(args)
                }

                fn parse_response(
                    _response: &$crate::action::ActionResponse,
                ) -> $crate::error::Result<Self::Response> {
                    Ok(())
                }
            }

            // Generate convenience function
            pub fn [<$op_struct:snake>](
                actions: &dyn $crate::action::SonosActions,
                base_url: &str,
                $($field: $field_type),*
            ) -> $crate::error::Result<()> {
                let request = [<$op_struct Request>] { $($field,)* };
                $crate::operation::execute::<$op_struct>(actions, base_url, &request)
            }
        }
    };
}

/// Define an operation with typed output arguments
///
/// # Example
/// ```rust,ignore
/// define_operation_with_response! {
///     operation: GetVolumeOperation,
///     action: "GetVolume",
///     service: RenderingControl,
///     fixed: { "InstanceID" => "0", "Channel" => "Master" },
///     request: {},
///     response: GetVolumeResponse {
///         current_volume: u16 => "CurrentVolume",
///     },
/// }
/// ```
#[macro_export]
macro_rules! define_operation_with_response {
    (
        operation: $op_struct:ident,
        action: $action:literal,
        service: $service:ident,
        fixed: { $($fixed_name:literal => $fixed_value:literal),* $(,)? },
        request: {
            $($field:ident: $field_type:ty => $arg_name:literal),* $(,)?
        },
        response: $response_struct:ident {
            $($resp_field:ident: $resp_type:ty => $out_name:literal),* $(,)?
        } $(,)?
    ) => {
        paste! {
            #[derive(serde::Serialize, Clone, Debug, PartialEq)]
            pub struct [<$op_struct Request>] {
                $(pub $field: $field_type,)*
            }

            #[derive(serde::Serialize, Clone, Debug, PartialEq)]
            pub struct $response_struct {
                $(pub $resp_field: $resp_type,)*
            }

            pub struct $op_struct;

            impl $crate::operation::SonosOperation for $op_struct {
                type Request = [<$op_struct Request>];
                type Response = $response_struct;

                const SERVICE: $crate::service::Service = $crate::service::Service::$service;
                const ACTION: &'static str = $action;

                fn build_args(
                    request: &Self::Request,
                ) -> ::std::result::Result<::std::vec::Vec<(String, String)>, $crate::operation::ValidationError> {
                    $crate::operation::Validate::validate_basic(request)?;

                    #[allow(unused_mut)]
                    let mut args: ::std::vec::Vec<(String, String)> =
                        ::std::vec![$(($fixed_name.to_string(), $fixed_value.to_string())),*];
                    $(
                        args.push((
                            $arg_name.to_string(),
                            $crate::operation::ActionArg::to_arg(&request.$field),
                        ));
                    )*
                    Ok(args)
                }

                fn parse_response(
                    response: &$crate::action::ActionResponse,
                ) -> $crate::error::Result<Self::Response> {
                    Ok($response_struct {
                        $(
                            $resp_field: <$resp_type as $crate::operation::FromArg>::from_arg(
                                $out_name,
                                response.require($out_name)?,
                            )?,
                        )*
                    })
                }
            }

            // Generate convenience function
            pub fn [<$op_struct:snake>](
                actions: &dyn $crate::action::SonosActions,
                base_url: &str,
                $($field: $field_type),*
            ) -> $crate::error::Result<$response_struct> {
                let request = [<$op_struct Request>] { $($field,)* };
                $crate::operation::execute::<$op_struct>(actions, base_url, &request)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::action::{ActionResponse, SonosActions};
    use crate::error::{ApiError, Result};
    use crate::operation::{SonosOperation, Validate, ValidationError};
    use paste::paste;
    use sonos_discovery::DeviceDescription;
    use std::cell::RefCell;

    define_operation_with_response! {
        operation: SetLevelOperation,
        action: "SetLevel",
        service: RenderingControl,
        fixed: { "InstanceID" => "0", "Channel" => "Master" },
        request: {
            level: u16 => "DesiredLevel",
            enabled: bool => "Enabled",
        },
        response: SetLevelResponse {
            new_level: u16 => "NewLevel",
            label: String => "Label",
        },
    }

    impl Validate for SetLevelOperationRequest {
        fn validate_basic(&self) -> std::result::Result<(), ValidationError> {
            if self.level > 100 {
                return Err(ValidationError::range_error("level", 0, 100, self.level));
            }
            Ok(())
        }
    }

    define_upnp_operation! {
        operation: PokeOperation,
        action: "Poke",
        service: AVTransport,
        fixed: {},
        request: {},
    }

    impl Validate for PokeOperationRequest {}

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(String, String, Vec<(String, String)>)>>,
    }

    impl SonosActions for Recorder {
        fn execute_action(
            &self,
            _base_url: &str,
            endpoint: &str,
            action: &str,
            args: &[(String, String)],
        ) -> Result<ActionResponse> {
            self.calls
                .borrow_mut()
                .push((endpoint.to_string(), action.to_string(), args.to_vec()));
            Ok(ActionResponse::new(vec![
                ("NewLevel".to_string(), "31".to_string()),
                ("Label".to_string(), "ok".to_string()),
            ]))
        }

        fn device_description(&self, _base_url: &str) -> Result<DeviceDescription> {
            Err(ApiError::DeviceError("not used".to_string()))
        }
    }

    #[test]
    fn test_fixed_arguments_come_first() {
        let request = SetLevelOperationRequest { level: 30, enabled: true };
        let args = SetLevelOperation::build_args(&request).unwrap();
        let names: Vec<_> = args.iter().map(|(name, _)| name.as_str()).collect();

        assert_eq!(names, ["InstanceID", "Channel", "DesiredLevel", "Enabled"]);
        assert_eq!(args[3].1, "1");
    }

    #[test]
    fn test_convenience_function_executes_and_parses() {
        let recorder = Recorder::default();
        let response = set_level_operation(&recorder, "http://10.0.0.1:1400", 30, false).unwrap();

        assert_eq!(response, SetLevelResponse { new_level: 31, label: "ok".to_string() });
        let calls = recorder.calls.borrow();
        assert_eq!(calls[0].0, "/MediaRenderer/RenderingControl/Control");
        assert_eq!(calls[0].1, "SetLevel");
    }

    #[test]
    fn test_validation_stops_the_call() {
        let recorder = Recorder::default();
        let result = set_level_operation(&recorder, "http://10.0.0.1:1400", 101, false);

        assert!(matches!(result, Err(ApiError::InvalidParameter(_))));
        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn test_unit_operation_without_arguments() {
        let recorder = Recorder::default();
        poke_operation(&recorder, "http://10.0.0.1:1400").unwrap();

        let calls = recorder.calls.borrow();
        assert_eq!(calls[0].1, "Poke");
        assert!(calls[0].2.is_empty());
    }
}
