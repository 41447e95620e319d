//! Login route hosting the authentication state machine: sign-in and
//! registration, the email-verification step, both MFA screens, the forced
//! password change, and the password-reset flow. The page renders whatever
//! [`FlowState`] the controller is in and forwards each user action as one
//! flow call; completion is reported back as an event and handled here by
//! navigating away.

use std::rc::Rc;

use crate::app_lib::AppError;
use crate::components::{Alert, AlertKind, AppShell, Button, Spinner};
use crate::features::auth::flow::{AuthFlow, FlowEvent, FlowState};
use crate::features::auth::state::use_auth_client;
use crate::routes::paths;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

const INPUT_CLASS: &str = "w-full rounded-xl border border-slate-200 bg-slate-50 px-3 py-2.5 text-sm text-slate-900 focus:border-violet-400 focus:ring-2 focus:ring-violet-200";
const LINK_CLASS: &str = "text-sm font-medium text-violet-700 underline decoration-violet-300 underline-offset-4 hover:text-violet-900 cursor-pointer";

/// Which form the idle state shows.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Panel {
    SignIn,
    Register,
    ForgotPassword,
}

/// One user action, carried into the async flow call.
#[derive(Clone)]
enum FlowInput {
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        repeat_password: String,
    },
    VerifyEmail {
        code: String,
    },
    Challenge {
        code: String,
        remember_device: bool,
        device_name: Option<String>,
    },
    NewPassword {
        password: String,
        confirm_password: String,
    },
    StartReset {
        email: String,
    },
    ConfirmReset {
        email: String,
        code: String,
        password: String,
        confirm_password: String,
    },
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let client = use_auth_client();
    let navigate = use_navigate();
    let query = use_query_map();

    let flow = Rc::new(AuthFlow::new(client));

    let (flow_state, set_flow_state) = signal(FlowState::Idle);
    let (panel, set_panel) = signal(Panel::SignIn);
    let (error, set_error) = signal::<Option<AppError>>(None);
    let (info, set_info) = signal::<Option<String>>(None);

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (repeat_password, set_repeat_password) = signal(String::new());
    let (code, set_code) = signal(String::new());
    let (device_name, set_device_name) = signal(String::new());
    let (remember_device, set_remember_device) = signal(false);
    let (new_password, set_new_password) = signal(String::new());
    let (confirm_password, set_confirm_password) = signal(String::new());

    let flow_for_submit = flow.clone();
    let submit = Action::new_local(move |input: &FlowInput| {
        let flow = flow_for_submit.clone();
        let input = input.clone();
        async move {
            match input {
                FlowInput::Login { email, password } => {
                    flow.submit_login(&email, &password).await
                }
                FlowInput::Register {
                    email,
                    password,
                    repeat_password,
                } => {
                    flow.submit_register(&email, &password, &repeat_password)
                        .await
                }
                FlowInput::VerifyEmail { code } => {
                    flow.submit_email_verification_code(&code).await
                }
                FlowInput::Challenge {
                    code,
                    remember_device,
                    device_name,
                } => {
                    flow.submit_challenge_response(&code, remember_device, device_name.as_deref())
                        .await
                }
                FlowInput::NewPassword {
                    password,
                    confirm_password,
                } => flow.submit_new_password(&password, &confirm_password).await,
                FlowInput::StartReset { email } => flow.start_password_reset(&email).await,
                FlowInput::ConfirmReset {
                    email,
                    code,
                    password,
                    confirm_password,
                } => {
                    flow.confirm_password_reset(&email, &code, &password, &confirm_password)
                        .await
                }
            }
        }
    });

    let clear_secrets = move || {
        set_password.set(String::new());
        set_repeat_password.set(String::new());
        set_code.set(String::new());
        set_device_name.set(String::new());
        set_remember_device.set(false);
        set_new_password.set(String::new());
        set_confirm_password.set(String::new());
    };

    let flow_for_effect = flow.clone();
    let navigate_for_effect = navigate.clone();
    Effect::new(move |_| {
        if let Some(result) = submit.value().get() {
            set_flow_state.set(flow_for_effect.state());
            match result {
                Ok(FlowEvent::Completed) => {
                    clear_secrets();
                    set_email.set(String::new());
                    // The session gate on the destination re-validates and
                    // hydrates the session.
                    let destination = query
                        .get_untracked()
                        .get("from")
                        .unwrap_or_else(|| paths::HOME.to_string());
                    navigate_for_effect(&destination, Default::default());
                }
                Ok(FlowEvent::VerificationComplete) => {
                    clear_secrets();
                    set_panel.set(Panel::SignIn);
                    set_info.set(Some(
                        "Your account is confirmed. You can sign in now.".to_string(),
                    ));
                }
                Ok(FlowEvent::ResetComplete) => {
                    clear_secrets();
                    set_panel.set(Panel::SignIn);
                    set_info.set(Some(
                        "Your password has been reset. Sign in with the new one.".to_string(),
                    ));
                }
                Ok(FlowEvent::StateChanged) => {
                    set_code.set(String::new());
                }
                Ok(FlowEvent::Stalled) => {}
                Err(err) => set_error.set(Some(err)),
            }
        }
    });

    let flow_for_cancel = flow.clone();
    let cancel = move |_| {
        flow_for_cancel.cancel();
        set_flow_state.set(FlowState::Idle);
        set_error.set(None);
        set_info.set(None);
        clear_secrets();
    };

    let dispatch = move |input: FlowInput| {
        set_error.set(None);
        set_info.set(None);
        submit.dispatch(input);
    };

    view! {
        <AppShell>
            <div class="min-h-[70vh] flex items-center justify-center px-6 py-10">
                <div class="w-full max-w-md rounded-2xl border border-slate-200 bg-white p-6 sm:p-8 space-y-6">
                    {move || {
                        let cancel = cancel.clone();
                        match flow_state.get() {
                            FlowState::Idle => {
                                match panel.get() {
                                    Panel::SignIn => {
                                        let on_submit = move |event: SubmitEvent| {
                                            event.prevent_default();
                                            dispatch(FlowInput::Login {
                                                email: email.get_untracked(),
                                                password: password.get_untracked(),
                                            });
                                        };
                                        view! {
                                            <form class="space-y-4" on:submit=on_submit>
                                                <h1 class="text-2xl font-semibold">"Sign in"</h1>
                                                <div>
                                                    <label class="block mb-2 text-sm font-medium" for="email">
                                                        "Email"
                                                    </label>
                                                    <input
                                                        id="email"
                                                        type="email"
                                                        class=INPUT_CLASS
                                                        autocomplete="email"
                                                        placeholder="name@inbox.im"
                                                        required
                                                        prop:value=email
                                                        on:input=move |event| set_email.set(event_target_value(&event))
                                                    />
                                                </div>
                                                <div>
                                                    <label class="block mb-2 text-sm font-medium" for="password">
                                                        "Password"
                                                    </label>
                                                    <input
                                                        id="password"
                                                        type="password"
                                                        class=INPUT_CLASS
                                                        autocomplete="current-password"
                                                        required
                                                        prop:value=password
                                                        on:input=move |event| set_password.set(event_target_value(&event))
                                                    />
                                                </div>
                                                <Button button_type="submit" disabled=submit.pending()>
                                                    "Sign in"
                                                </Button>
                                                <div class="flex justify-between">
                                                    <button
                                                        type="button"
                                                        class=LINK_CLASS
                                                        on:click=move |_| set_panel.set(Panel::Register)
                                                    >
                                                        "Create an account"
                                                    </button>
                                                    <button
                                                        type="button"
                                                        class=LINK_CLASS
                                                        on:click=move |_| set_panel.set(Panel::ForgotPassword)
                                                    >
                                                        "Forgot password?"
                                                    </button>
                                                </div>
                                            </form>
                                        }
                                            .into_any()
                                    }
                                    Panel::Register => {
                                        let on_submit = move |event: SubmitEvent| {
                                            event.prevent_default();
                                            dispatch(FlowInput::Register {
                                                email: email.get_untracked(),
                                                password: password.get_untracked(),
                                                repeat_password: repeat_password.get_untracked(),
                                            });
                                        };
                                        view! {
                                            <form class="space-y-4" on:submit=on_submit>
                                                <h1 class="text-2xl font-semibold">"Create account"</h1>
                                                <div>
                                                    <label class="block mb-2 text-sm font-medium" for="email">
                                                        "Email"
                                                    </label>
                                                    <input
                                                        id="email"
                                                        type="email"
                                                        class=INPUT_CLASS
                                                        autocomplete="email"
                                                        placeholder="name@inbox.im"
                                                        required
                                                        prop:value=email
                                                        on:input=move |event| set_email.set(event_target_value(&event))
                                                    />
                                                </div>
                                                <div>
                                                    <label class="block mb-2 text-sm font-medium" for="password">
                                                        "Password"
                                                    </label>
                                                    <input
                                                        id="password"
                                                        type="password"
                                                        class=INPUT_CLASS
                                                        autocomplete="new-password"
                                                        required
                                                        prop:value=password
                                                        on:input=move |event| set_password.set(event_target_value(&event))
                                                    />
                                                </div>
                                                <div>
                                                    <label class="block mb-2 text-sm font-medium" for="repeat_password">
                                                        "Repeat password"
                                                    </label>
                                                    <input
                                                        id="repeat_password"
                                                        type="password"
                                                        class=INPUT_CLASS
                                                        autocomplete="new-password"
                                                        required
                                                        prop:value=repeat_password
                                                        on:input=move |event| {
                                                            set_repeat_password.set(event_target_value(&event));
                                                        }
                                                    />
                                                </div>
                                                <Button button_type="submit" disabled=submit.pending()>
                                                    "Create account"
                                                </Button>
                                                <button
                                                    type="button"
                                                    class=LINK_CLASS
                                                    on:click=move |_| set_panel.set(Panel::SignIn)
                                                >
                                                    "Already have an account? Sign in"
                                                </button>
                                            </form>
                                        }
                                            .into_any()
                                    }
                                    Panel::ForgotPassword => {
                                        let on_submit = move |event: SubmitEvent| {
                                            event.prevent_default();
                                            dispatch(FlowInput::StartReset {
                                                email: email.get_untracked(),
                                            });
                                        };
                                        view! {
                                            <form class="space-y-4" on:submit=on_submit>
                                                <h1 class="text-2xl font-semibold">"Reset password"</h1>
                                                <p class="text-sm text-slate-500">
                                                    "We will email you a reset code."
                                                </p>
                                                <div>
                                                    <label class="block mb-2 text-sm font-medium" for="email">
                                                        "Email"
                                                    </label>
                                                    <input
                                                        id="email"
                                                        type="email"
                                                        class=INPUT_CLASS
                                                        autocomplete="email"
                                                        required
                                                        prop:value=email
                                                        on:input=move |event| set_email.set(event_target_value(&event))
                                                    />
                                                </div>
                                                <Button button_type="submit" disabled=submit.pending()>
                                                    "Send reset code"
                                                </Button>
                                                <button
                                                    type="button"
                                                    class=LINK_CLASS
                                                    on:click=move |_| set_panel.set(Panel::SignIn)
                                                >
                                                    "Back to sign in"
                                                </button>
                                            </form>
                                        }
                                            .into_any()
                                    }
                                }
                            }
                            FlowState::AwaitingEmailVerification { email: account } => {
                                view! {
                                    <div class="space-y-4">
                                        <h1 class="text-2xl font-semibold">"Verify your email"</h1>
                                        <p class="text-sm text-slate-500">
                                            {format!("We sent a verification code to {account}.")}
                                        </p>
                                        <input
                                            type="text"
                                            class=INPUT_CLASS
                                            inputmode="numeric"
                                            placeholder="Verification code"
                                            prop:value=code
                                            on:input=move |event| set_code.set(event_target_value(&event))
                                        />
                                        <Button
                                            disabled=submit.pending()
                                            on:click=move |_| {
                                                dispatch(FlowInput::VerifyEmail {
                                                    code: code.get_untracked(),
                                                });
                                            }
                                        >
                                            "Confirm"
                                        </Button>
                                        <button type="button" class=LINK_CLASS on:click=cancel>
                                            "Back to sign in"
                                        </button>
                                    </div>
                                }
                                    .into_any()
                            }
                            FlowState::AwaitingMfaSetup {
                                shared_secret,
                                setup_uri,
                                ..
                            } => {
                                view! {
                                    <div class="space-y-4">
                                        <h1 class="text-2xl font-semibold">"Set up two-factor"</h1>
                                        <p class="text-sm text-slate-500">
                                            "Add this account to your authenticator app, then enter the 6-digit code it shows."
                                        </p>
                                        <a class=LINK_CLASS href=setup_uri.clone()>
                                            "Open in authenticator"
                                        </a>
                                        <p class="text-xs font-mono text-slate-500 break-all">
                                            "Secret: " {shared_secret.clone()}
                                        </p>
                                        <input
                                            type="text"
                                            class=INPUT_CLASS
                                            inputmode="numeric"
                                            placeholder="6-digit code"
                                            prop:value=code
                                            on:input=move |event| set_code.set(event_target_value(&event))
                                        />
                                        <input
                                            type="text"
                                            class=INPUT_CLASS
                                            placeholder="Device name (optional)"
                                            prop:value=device_name
                                            on:input=move |event| {
                                                set_device_name.set(event_target_value(&event));
                                            }
                                        />
                                        <label class="flex items-center gap-2 text-sm text-slate-600">
                                            <input
                                                type="checkbox"
                                                prop:checked=remember_device
                                                on:change=move |event| {
                                                    set_remember_device.set(event_target_checked(&event));
                                                }
                                            />
                                            "Remember this device"
                                        </label>
                                        <Button
                                            disabled=submit.pending()
                                            on:click=move |_| {
                                                let device = device_name.get_untracked();
                                                let device = (!device.trim().is_empty()).then_some(device);
                                                dispatch(FlowInput::Challenge {
                                                    code: code.get_untracked(),
                                                    remember_device: remember_device.get_untracked(),
                                                    device_name: device,
                                                });
                                            }
                                        >
                                            "Verify and enable"
                                        </Button>
                                        <button type="button" class=LINK_CLASS on:click=cancel>
                                            "Cancel"
                                        </button>
                                    </div>
                                }
                                    .into_any()
                            }
                            FlowState::AwaitingMfaCode { .. } => {
                                view! {
                                    <div class="space-y-4">
                                        <h1 class="text-2xl font-semibold">"Two-factor check"</h1>
                                        <p class="text-sm text-slate-500">
                                            "Enter the 6-digit code from your authenticator app."
                                        </p>
                                        <input
                                            type="text"
                                            class=INPUT_CLASS
                                            inputmode="numeric"
                                            placeholder="6-digit code"
                                            prop:value=code
                                            on:input=move |event| set_code.set(event_target_value(&event))
                                        />
                                        <label class="flex items-center gap-2 text-sm text-slate-600">
                                            <input
                                                type="checkbox"
                                                prop:checked=remember_device
                                                on:change=move |event| {
                                                    set_remember_device.set(event_target_checked(&event));
                                                }
                                            />
                                            "Remember this device"
                                        </label>
                                        <Button
                                            disabled=submit.pending()
                                            on:click=move |_| {
                                                dispatch(FlowInput::Challenge {
                                                    code: code.get_untracked(),
                                                    remember_device: remember_device.get_untracked(),
                                                    device_name: None,
                                                });
                                            }
                                        >
                                            "Verify"
                                        </Button>
                                        <button type="button" class=LINK_CLASS on:click=cancel>
                                            "Cancel"
                                        </button>
                                    </div>
                                }
                                    .into_any()
                            }
                            FlowState::AwaitingNewPassword { .. } => {
                                view! {
                                    <div class="space-y-4">
                                        <h1 class="text-2xl font-semibold">"Choose a new password"</h1>
                                        <p class="text-sm text-slate-500">
                                            "Your account requires a new password before signing in."
                                        </p>
                                        <input
                                            type="password"
                                            class=INPUT_CLASS
                                            autocomplete="new-password"
                                            placeholder="New password"
                                            prop:value=new_password
                                            on:input=move |event| {
                                                set_new_password.set(event_target_value(&event));
                                            }
                                        />
                                        <input
                                            type="password"
                                            class=INPUT_CLASS
                                            autocomplete="new-password"
                                            placeholder="Confirm new password"
                                            prop:value=confirm_password
                                            on:input=move |event| {
                                                set_confirm_password.set(event_target_value(&event));
                                            }
                                        />
                                        <Button
                                            disabled=submit.pending()
                                            on:click=move |_| {
                                                dispatch(FlowInput::NewPassword {
                                                    password: new_password.get_untracked(),
                                                    confirm_password: confirm_password.get_untracked(),
                                                });
                                            }
                                        >
                                            "Save password"
                                        </Button>
                                        <button type="button" class=LINK_CLASS on:click=cancel>
                                            "Cancel"
                                        </button>
                                    </div>
                                }
                                    .into_any()
                            }
                            FlowState::AwaitingPasswordReset { email: account } => {
                                let account_for_submit = account.clone();
                                view! {
                                    <div class="space-y-4">
                                        <h1 class="text-2xl font-semibold">"Enter your reset code"</h1>
                                        <p class="text-sm text-slate-500">
                                            {format!("We sent a reset code to {account}.")}
                                        </p>
                                        <input
                                            type="text"
                                            class=INPUT_CLASS
                                            inputmode="numeric"
                                            placeholder="Reset code"
                                            prop:value=code
                                            on:input=move |event| set_code.set(event_target_value(&event))
                                        />
                                        <input
                                            type="password"
                                            class=INPUT_CLASS
                                            autocomplete="new-password"
                                            placeholder="New password"
                                            prop:value=new_password
                                            on:input=move |event| {
                                                set_new_password.set(event_target_value(&event));
                                            }
                                        />
                                        <input
                                            type="password"
                                            class=INPUT_CLASS
                                            autocomplete="new-password"
                                            placeholder="Confirm new password"
                                            prop:value=confirm_password
                                            on:input=move |event| {
                                                set_confirm_password.set(event_target_value(&event));
                                            }
                                        />
                                        <Button
                                            disabled=submit.pending()
                                            on:click=move |_| {
                                                dispatch(FlowInput::ConfirmReset {
                                                    email: account_for_submit.clone(),
                                                    code: code.get_untracked(),
                                                    password: new_password.get_untracked(),
                                                    confirm_password: confirm_password.get_untracked(),
                                                });
                                            }
                                        >
                                            "Reset password"
                                        </Button>
                                        <button type="button" class=LINK_CLASS on:click=cancel>
                                            "Cancel"
                                        </button>
                                    </div>
                                }
                                    .into_any()
                            }
                        }
                    }}

                    {move || {
                        submit
                            .pending()
                            .get()
                            .then_some(view! { <div class="flex justify-center"><Spinner /></div> })
                    }}
                    {move || {
                        info.get()
                            .map(|message| view! { <Alert kind=AlertKind::Info message=message /> })
                    }}
                    {move || {
                        error
                            .get()
                            .map(|err| view! { <Alert kind=AlertKind::Error message=err.to_string() /> })
                    }}
                </div>
            </div>
        </AppShell>
    }
}
