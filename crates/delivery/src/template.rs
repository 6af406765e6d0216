//! HTML rendering for the intake notification emails.
//!
//! Two messages go out per submission: the admin notification with every
//! answer grouped by section, and the short confirmation the client
//! receives. Both render against the schema so labels and section titles
//! come from the form definition rather than raw ids. All user-entered
//! values are HTML-escaped; textarea answers keep their line breaks.

use atelier_core::money::{format_bs, format_usd};
use atelier_core::schema::{FormSchema, QuestionKind};
use atelier_core::submission::SubmissionPayload;
use chrono::{DateTime, FixedOffset};

/// Shown in place of an empty answer.
const NO_ANSWER: &str = "<em>Sin respuesta</em>";

// ---------------------------------------------------------------------------
// Subjects
// ---------------------------------------------------------------------------

pub fn admin_subject(payload: &SubmissionPayload) -> String {
    let empresa = if payload.empresa.trim().is_empty() {
        "Sin empresa"
    } else {
        payload.empresa.as_str()
    };
    format!(
        "📋 Nuevo Cuestionario — {} ({}) · ${}",
        payload.nombre,
        empresa,
        format_usd(payload.monto_a_pagar)
    )
}

pub fn confirmation_subject(schema: &FormSchema) -> String {
    format!("✅ Recibimos tu solicitud — {}", schema.title)
}

// ---------------------------------------------------------------------------
// Admin notification
// ---------------------------------------------------------------------------

/// Full admin notification: client block, every question grouped by
/// section, the extras rundown and the payment information.
pub fn render_admin_html(
    schema: &FormSchema,
    payload: &SubmissionPayload,
    received_at: DateTime<FixedOffset>,
) -> String {
    let mut rows = String::new();
    question_rows(&mut rows, schema, payload);
    extras_rows(&mut rows, schema, payload);
    payment_rows(&mut rows, schema, payload);

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="margin: 0; padding: 0; background: #0c0a09; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;">
  <table width="100%" cellpadding="0" cellspacing="0" style="background: #0c0a09; padding: 40px 20px;">
    <tr><td align="center">
      <table width="620" cellpadding="0" cellspacing="0" style="background: #1c1917; border-radius: 16px; overflow: hidden; border: 1px solid #292524;">
        <tr>
          <td style="padding: 32px 24px; background: linear-gradient(135deg, #1c1917 0%, #292524 100%); border-bottom: 2px solid #c2703e;">
            <h1 style="margin: 0; color: #ffffff; font-size: 22px; font-weight: 700;">📋 Nuevo Cuestionario — {title}</h1>
            <p style="margin: 8px 0 0; color: #a8a29e; font-size: 13px;">Schema: {schema_id} | {timestamp}</p>
          </td>
        </tr>
        <tr>
          <td style="padding: 24px;">
            <table width="100%" cellpadding="0" cellspacing="0" style="background: #292524; border-radius: 12px; overflow: hidden;">
              {client_rows}
            </table>
          </td>
        </tr>
        {rows}
        <tr>
          <td style="padding: 24px; background: #0c0a09; text-align: center;">
            <p style="margin: 0; color: #57534e; font-size: 12px;">Alfredo Mendoza — Arquitecto Digital</p>
          </td>
        </tr>
      </table>
    </td></tr>
  </table>
</body>
</html>"#,
        title = escape_html(&schema.title),
        schema_id = escape_html(&payload.schema_id),
        timestamp = format_timestamp(received_at),
        client_rows = client_rows(payload),
        rows = rows,
    )
}

fn client_rows(payload: &SubmissionPayload) -> String {
    let empresa = if payload.empresa.trim().is_empty() {
        "No especificada".to_string()
    } else {
        escape_html(&payload.empresa)
    };
    let email = escape_html(&payload.email);
    format!(
        r#"<tr>
                <td style="padding: 16px 20px; border-bottom: 1px solid #3a3530;">
                  <span style="color: #a8a29e; font-size: 12px; text-transform: uppercase; letter-spacing: 1px;">Cliente</span>
                  <p style="margin: 4px 0 0; color: #ffffff; font-size: 16px; font-weight: 600;">{nombre}</p>
                </td>
              </tr>
              <tr>
                <td style="padding: 16px 20px; border-bottom: 1px solid #3a3530;">
                  <span style="color: #a8a29e; font-size: 12px; text-transform: uppercase; letter-spacing: 1px;">Email</span>
                  <p style="margin: 4px 0 0; color: #c2703e; font-size: 16px;"><a href="mailto:{email}" style="color: #c2703e; text-decoration: none;">{email}</a></p>
                </td>
              </tr>
              <tr>
                <td style="padding: 16px 20px; border-bottom: 1px solid #3a3530;">
                  <span style="color: #a8a29e; font-size: 12px; text-transform: uppercase; letter-spacing: 1px;">Teléfono / WhatsApp</span>
                  <p style="margin: 4px 0 0; color: #ffffff; font-size: 16px;">{telefono}</p>
                </td>
              </tr>
              <tr>
                <td style="padding: 16px 20px;">
                  <span style="color: #a8a29e; font-size: 12px; text-transform: uppercase; letter-spacing: 1px;">Empresa / Marca</span>
                  <p style="margin: 4px 0 0; color: #ffffff; font-size: 16px;">{empresa}</p>
                </td>
              </tr>"#,
        nombre = escape_html(&payload.nombre),
        email = email,
        telefono = escape_html(&payload.telefono),
        empresa = empresa,
    )
}

fn question_rows(out: &mut String, schema: &FormSchema, payload: &SubmissionPayload) {
    let mut position = 0usize;
    for section in &schema.sections {
        out.push_str(&format!(
            r#"
        <tr>
          <td colspan="2" style="padding: 20px 24px 8px; background: #1a1a1a; border-bottom: 2px solid #c2703e;">
            <h3 style="margin: 0; color: #c2703e; font-size: 14px; text-transform: uppercase; letter-spacing: 2px;">{}</h3>
          </td>
        </tr>"#,
            escape_html(&section.title)
        ));
        for question in &section.questions {
            position += 1;
            let answer = payload
                .respuestas
                .get(&question.id)
                .map(String::as_str)
                .unwrap_or("");
            let rendered = if answer.trim().is_empty() {
                NO_ANSWER.to_string()
            } else {
                match question.kind {
                    QuestionKind::Textarea => multiline_html(answer),
                    _ => escape_html(answer),
                }
            };
            out.push_str(&format!(
                r#"
        <tr>
          <td style="padding: 16px 24px; border-bottom: 1px solid #2a2a2a;">
            <p style="margin: 0 0 4px; color: #a8a29e; font-size: 11px; font-weight: 700; text-transform: uppercase; letter-spacing: 1px;">P{position}</p>
            <p style="margin: 0 0 6px; color: #a8a29e; font-size: 13px; font-weight: 600;">{label}</p>
            <p style="margin: 0; color: #ffffff; font-size: 15px; line-height: 1.6;">{rendered}</p>
          </td>
        </tr>"#,
                position = position,
                label = escape_html(&question.label),
                rendered = rendered,
            ));
        }
    }
}

fn extras_rows(out: &mut String, schema: &FormSchema, payload: &SubmissionPayload) {
    if schema.extras.is_empty() {
        return;
    }
    out.push_str(
        r#"
        <tr>
          <td colspan="2" style="padding: 20px 24px 8px; background: #1a1a1a; border-bottom: 2px solid #c2703e;">
            <h3 style="margin: 0; color: #c2703e; font-size: 14px; text-transform: uppercase; letter-spacing: 2px;">Extras Seleccionados</h3>
          </td>
        </tr>"#,
    );
    for extra in &schema.extras {
        let selected = payload.extras.get(&extra.id).copied().unwrap_or(false);
        let price_tag = if extra.negotiable {
            "A negociar".to_string()
        } else {
            format!("+${}", extra.price)
        };
        let status = if selected {
            "✅ Sí, solicitado"
        } else {
            "❌ No seleccionado"
        };
        out.push_str(&format!(
            r#"
        <tr>
          <td style="padding: 16px 24px; border-bottom: 1px solid #2a2a2a;">
            <p style="margin: 0 0 6px; color: #a8a29e; font-size: 13px;">{title} — {price_tag}</p>
            <p style="margin: 0; color: #ffffff; font-size: 15px; font-weight: 600;">{status}</p>
          </td>
        </tr>"#,
            title = escape_html(&extra.title),
            price_tag = price_tag,
            status = status,
        ));
    }
}

fn payment_rows(out: &mut String, schema: &FormSchema, payload: &SubmissionPayload) {
    let rate_line = match payload.dolar_rate {
        Some(rate) => format!("Tasa BCV del día: Bs. {} / $1", format_usd(rate)),
        None => "Tasa BCV del día: no disponible".to_string(),
    };
    let method_label = schema
        .payment_method(&payload.pago.metodo_pago)
        .map(|m| m.label.as_str())
        .unwrap_or(payload.pago.metodo_pago.as_str());

    let mut detalles = format!(
        r#"
          <p style="margin: 6px 0 0; color: #ffffff; font-size: 14px;">💳 <strong>Método:</strong> {}</p>"#,
        escape_html(method_label)
    );
    if let Some(method) = schema.payment_method(&payload.pago.metodo_pago) {
        for field in &method.fields {
            let value = payload
                .pago
                .respuestas
                .get(&field.id)
                .map(String::as_str)
                .unwrap_or("");
            detalles.push_str(&format!(
                r#"
          <p style="margin: 4px 0; color: #ffffff; font-size: 14px;"><strong>{}:</strong> {}</p>"#,
                escape_html(&field.label),
                escape_html(value),
            ));
        }
    }

    out.push_str(&format!(
        r#"
        <tr>
          <td colspan="2" style="padding: 20px 24px 8px; background: #1a1a1a; border-bottom: 2px solid #c2703e;">
            <h3 style="margin: 0; color: #c2703e; font-size: 14px; text-transform: uppercase; letter-spacing: 2px;">💰 Información de Pago</h3>
          </td>
        </tr>
        <tr>
          <td style="padding: 16px 24px; border-bottom: 1px solid #2a2a2a;">
            <p style="margin: 0; color: #c2703e; font-size: 20px; font-weight: 700;">${monto} USD ({porcentaje}%)</p>
            <p style="margin: 4px 0; color: #f59e0b; font-size: 16px; font-weight: 600;">Bs. {bolivares}</p>
            <p style="margin: 4px 0; color: #78716c; font-size: 13px;">{rate_line}</p>{detalles}
          </td>
        </tr>"#,
        monto = format_usd(payload.monto_a_pagar),
        porcentaje = payload.pago.porcentaje.as_u32(),
        bolivares = format_bs(payload.monto_bolivares),
        rate_line = rate_line,
        detalles = detalles,
    ));
}

// ---------------------------------------------------------------------------
// Client confirmation
// ---------------------------------------------------------------------------

/// Short thank-you note with a summary card of what was received.
pub fn render_confirmation_html(schema: &FormSchema, payload: &SubmissionPayload) -> String {
    let empresa_frase = if payload.empresa.trim().is_empty() {
        "tu negocio".to_string()
    } else {
        escape_html(&payload.empresa)
    };
    let empresa_card = if payload.empresa.trim().is_empty() {
        "Tu negocio".to_string()
    } else {
        escape_html(&payload.empresa)
    };
    let method_label = schema
        .payment_method(&payload.pago.metodo_pago)
        .map(|m| m.label.as_str())
        .unwrap_or(payload.pago.metodo_pago.as_str());
    let answered = payload
        .respuestas
        .values()
        .filter(|v| !v.trim().is_empty())
        .count();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="margin: 0; padding: 0; background: #0c0a09; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;">
  <table width="100%" cellpadding="0" cellspacing="0" style="background: #0c0a09; padding: 40px 20px;">
    <tr><td align="center">
      <table width="600" cellpadding="0" cellspacing="0" style="background: #1c1917; border-radius: 16px; overflow: hidden; border: 1px solid #292524;">
        <tr>
          <td style="padding: 40px 32px; background: linear-gradient(135deg, #1c1917 0%, #292524 100%); text-align: center; border-bottom: 2px solid #c2703e;">
            <p style="margin: 0 0 8px; color: #c2703e; font-size: 12px; text-transform: uppercase; letter-spacing: 3px;">Arquitecto Digital</p>
            <h1 style="margin: 0; color: #ffffff; font-size: 26px; font-weight: 700;">¡Gracias, {nombre}!</h1>
          </td>
        </tr>
        <tr>
          <td style="padding: 32px;">
            <p style="color: #d6d3d1; font-size: 15px; line-height: 1.8; margin: 0 0 16px;">
              He recibido tu cuestionario y comprobante de pago para el sistema de <strong style="color: #ffffff;">{empresa_frase}</strong> correctamente. Estoy revisando tus respuestas para entender a fondo las necesidades de tu negocio.
            </p>
            <p style="color: #d6d3d1; font-size: 15px; line-height: 1.8; margin: 0 0 24px;">
              Me pondré en contacto contigo pronto para discutir los próximos pasos y presentarte una propuesta <span style="color: #c2703e; font-weight: 600;">personalizada</span>.
            </p>
            <table width="100%" cellpadding="0" cellspacing="0" style="background: #292524; border-radius: 12px; overflow: hidden; margin-bottom: 24px;">
              <tr>
                <td style="padding: 20px; border-bottom: 1px solid #3a3530;">
                  <span style="color: #c2703e; font-size: 12px; text-transform: uppercase; letter-spacing: 2px; font-weight: 700;">Resumen de tu envío</span>
                </td>
              </tr>
              <tr>
                <td style="padding: 16px 20px;">
                  <p style="margin: 0 0 8px; color: #a8a29e; font-size: 13px;">📧 <strong style="color: #ffffff;">{email}</strong></p>
                  <p style="margin: 0 0 8px; color: #a8a29e; font-size: 13px;">📱 <strong style="color: #ffffff;">{telefono}</strong></p>
                  <p style="margin: 0 0 8px; color: #a8a29e; font-size: 13px;">🏪 <strong style="color: #ffffff;">{empresa_card}</strong></p>
                  <p style="margin: 0 0 8px; color: #a8a29e; font-size: 13px;">💵 <strong style="color: #c2703e;">${monto} USD ({porcentaje}%)</strong> — {metodo}</p>
                  <p style="margin: 0; color: #a8a29e; font-size: 13px;">📋 <strong style="color: #ffffff;">{answered} preguntas respondidas</strong></p>
                </td>
              </tr>
            </table>
            <p style="color: #78716c; font-size: 13px; line-height: 1.6; margin: 0;">
              Si tienes alguna pregunta adicional, no dudes en responder directamente a este correo.
            </p>
          </td>
        </tr>
        <tr>
          <td style="padding: 24px 32px; background: #0c0a09; text-align: center; border-top: 1px solid #292524;">
            <p style="margin: 0 0 4px; color: #57534e; font-size: 12px;">Alfredo Mendoza — Arquitecto Digital</p>
            <p style="margin: 0; color: #44403c; font-size: 11px;">alfredomendoza.dev</p>
          </td>
        </tr>
      </table>
    </td></tr>
  </table>
</body>
</html>"#,
        nombre = escape_html(&payload.nombre),
        empresa_frase = empresa_frase,
        email = escape_html(&payload.email),
        telefono = escape_html(&payload.telefono),
        empresa_card = empresa_card,
        monto = format_usd(payload.monto_a_pagar),
        porcentaje = payload.pago.porcentaje.as_u32(),
        metodo = escape_html(method_label),
        answered = answered,
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Escape a user-entered value for interpolation into the HTML body.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape and keep line breaks visible (textarea answers).
fn multiline_html(value: &str) -> String {
    escape_html(value).replace('\n', "<br>")
}

fn format_timestamp(at: DateTime<FixedOffset>) -> String {
    at.format("%d/%m/%Y, %I:%M %p").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::pricing::quote;
    use atelier_core::state::{FormState, IdentityField};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn schema() -> FormSchema {
        serde_json::from_value(json!({
            "id": "heladeria",
            "title": "Sistema Digital para tu Heladería",
            "basePrice": 350,
            "sections": [
                {
                    "id": "negocio", "title": "Tu negocio", "icon": "Store",
                    "questions": [
                        { "id": "nombreNegocio", "label": "¿Cómo se llama tu negocio?",
                          "type": "text" },
                        { "id": "historia", "label": "Cuéntanos tu historia",
                          "type": "textarea" }
                    ]
                },
                {
                    "id": "productos", "title": "Productos", "icon": "IceCream2",
                    "questions": [
                        { "id": "sabores", "label": "¿Qué sabores ofreces?",
                          "type": "textarea" }
                    ]
                }
            ],
            "extras": [
                { "id": "app", "title": "App Móvil", "description": "x", "price": 150 },
                { "id": "pagos", "title": "Verificaciones Automáticas", "description": "x",
                  "price": 0, "negotiable": true }
            ],
            "paymentMethods": [
                {
                    "id": "pagoMovil", "label": "Pago Móvil (Bs)", "details": [],
                    "fields": [
                        { "id": "ultimos6", "label": "Últimos 6 dígitos",
                          "type": "text", "placeholder": "", "maxLength": 6 },
                        { "id": "telefonoDesde", "label": "Teléfono desde donde pagaste",
                          "type": "tel", "placeholder": "" }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    fn payload(rate: Option<rust_decimal::Decimal>) -> SubmissionPayload {
        let schema = schema();
        let mut state = FormState::seed(&schema);
        state.set_identity_field(IdentityField::Name, "Ana Pérez");
        state.set_identity_field(IdentityField::Email, "ana@correo.com");
        state.set_identity_field(IdentityField::Phone, "04121234567");
        state.set_answer("nombreNegocio", "Helados Luna").unwrap();
        state
            .set_answer("historia", "Línea uno\nLínea dos")
            .unwrap();
        state.toggle_extra("app", true).unwrap();
        state.set_payment_method(&schema, "pagoMovil").unwrap();
        state.set_payment_field(&schema, "ultimos6", "123456").unwrap();
        state
            .set_payment_field(&schema, "telefonoDesde", "04141112233")
            .unwrap();
        let q = quote(&schema, &state, rate);
        SubmissionPayload::assemble(&state, &q).unwrap()
    }

    fn received_at() -> DateTime<FixedOffset> {
        let caracas = FixedOffset::west_opt(4 * 3600).unwrap();
        caracas.with_ymd_and_hms(2026, 3, 14, 15, 9, 0).unwrap()
    }

    // -- admin email --

    #[test]
    fn admin_email_groups_questions_by_section() {
        let html = render_admin_html(&schema(), &payload(Some(dec!(40))), received_at());
        assert!(html.contains("Tu negocio"));
        assert!(html.contains("Productos"));
        assert!(html.contains(">P1<"));
        assert!(html.contains(">P3<"));
        assert!(html.contains("¿Cómo se llama tu negocio?"));
        assert!(html.contains("Helados Luna"));
    }

    #[test]
    fn blank_answers_render_as_sin_respuesta() {
        let html = render_admin_html(&schema(), &payload(None), received_at());
        // "sabores" was never answered.
        assert!(html.contains("<em>Sin respuesta</em>"));
    }

    #[test]
    fn textarea_answers_keep_line_breaks() {
        let html = render_admin_html(&schema(), &payload(None), received_at());
        assert!(html.contains("Línea uno<br>Línea dos"));
    }

    #[test]
    fn user_values_are_escaped() {
        let schema = schema();
        let mut p = payload(None);
        p.respuestas
            .insert("nombreNegocio".into(), "<script>alert(1)</script>".into());
        let html = render_admin_html(&schema, &p, received_at());
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn extras_show_selection_and_negotiable_tag() {
        let html = render_admin_html(&schema(), &payload(None), received_at());
        assert!(html.contains("Extras Seleccionados"));
        assert!(html.contains("App Móvil — +$150"));
        assert!(html.contains("✅ Sí, solicitado"));
        assert!(html.contains("Verificaciones Automáticas — A negociar"));
        assert!(html.contains("❌ No seleccionado"));
    }

    #[test]
    fn schema_without_extras_omits_the_block() {
        let mut v = serde_json::to_value(schema()).unwrap();
        v["extras"] = json!([]);
        let schema: FormSchema = serde_json::from_value(v).unwrap();
        let mut p = payload(None);
        p.extras.clear();
        let html = render_admin_html(&schema, &p, received_at());
        assert!(!html.contains("Extras Seleccionados"));
    }

    #[test]
    fn payment_block_formats_amounts_and_rate() {
        let html = render_admin_html(&schema(), &payload(Some(dec!(40))), received_at());
        // 350 + 150 extra, 100% deposit, rate 40.
        assert!(html.contains("$500.00 USD (100%)"));
        assert!(html.contains("Bs. 20.000,00"));
        assert!(html.contains("Tasa BCV del día: Bs. 40.00 / $1"));
        assert!(html.contains("Pago Móvil (Bs)"));
        assert!(html.contains("Últimos 6 dígitos"));
        assert!(html.contains("123456"));
    }

    #[test]
    fn missing_rate_renders_unavailable_line() {
        let html = render_admin_html(&schema(), &payload(None), received_at());
        assert!(html.contains("Tasa BCV del día: no disponible"));
        assert!(html.contains("Bs. 0,00"));
    }

    #[test]
    fn empty_company_falls_back_in_admin_email() {
        let html = render_admin_html(&schema(), &payload(None), received_at());
        assert!(html.contains("No especificada"));
    }

    #[test]
    fn timestamp_is_rendered() {
        let html = render_admin_html(&schema(), &payload(None), received_at());
        assert!(html.contains("14/03/2026, 03:09 PM"));
    }

    // -- confirmation email --

    #[test]
    fn confirmation_greets_and_summarizes() {
        let html = render_confirmation_html(&schema(), &payload(Some(dec!(40))));
        assert!(html.contains("¡Gracias, Ana Pérez!"));
        assert!(html.contains("tu negocio"));
        assert!(html.contains("$500.00 USD (100%)"));
        assert!(html.contains("Pago Móvil (Bs)"));
        assert!(html.contains("2 preguntas respondidas"));
    }

    #[test]
    fn confirmation_uses_company_when_present() {
        let schema = schema();
        let mut p = payload(None);
        p.empresa = "Helados Luna C.A.".into();
        let html = render_confirmation_html(&schema, &p);
        assert!(html.contains("Helados Luna C.A."));
    }

    // -- subjects --

    #[test]
    fn subjects_carry_name_company_and_amount() {
        let p = payload(Some(dec!(40)));
        assert_eq!(
            admin_subject(&p),
            "📋 Nuevo Cuestionario — Ana Pérez (Sin empresa) · $500.00"
        );
        assert_eq!(
            confirmation_subject(&schema()),
            "✅ Recibimos tu solicitud — Sistema Digital para tu Heladería"
        );
    }
}
