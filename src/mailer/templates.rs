//! Transactional email bodies: order confirmation and status updates.

use rust_decimal::Decimal;

use crate::mailer::OutboundEmail;
use crate::models::{Order, OrderStatus};

pub fn order_confirmation(order: &Order) -> OutboundEmail {
    let item_lines: String = order
        .items
        .iter()
        .map(|i| format!("  {} x{} - £{:.2}\n", i.name, i.quantity, i.price))
        .collect();
    let text = format!(
        "Hi {first_name},\n\nThank you for your order.\n\nOrder ID: {reference}\n\n{item_lines}\nTotal: £{amount:.2}\n\nWe'll email you tracking details when your order ships.\n",
        first_name = order.first_name,
        reference = order.reference,
        amount = order.amount,
    );

    let item_rows: String = order
        .items
        .iter()
        .map(|i| {
            format!(
                "<tr><td style=\"padding:8px;border-bottom:1px solid #eee\">{}</td>\
                 <td style=\"padding:8px;border-bottom:1px solid #eee;text-align:center\">{}</td>\
                 <td style=\"padding:8px;border-bottom:1px solid #eee;text-align:right\">{}</td></tr>",
                escape_html(&i.name),
                i.quantity,
                currency(i.price),
            )
        })
        .collect();
    let html = format!(
        "<div style=\"background:#f6f7f9;padding:24px\">\
         <div style=\"max-width:640px;margin:0 auto;background:#fff;border:1px solid #e5e7eb;border-radius:8px\">\
         <div style=\"background:#111827;color:#fff;padding:20px 24px;font-weight:600\">DecknTools</div>\
         <div style=\"padding:24px\">\
         <h1 style=\"margin:0 0 8px 0;font-size:22px\">Order Confirmed</h1>\
         <p>Hi {first_name}, thank you for your order.</p>\
         <p style=\"font-family:monospace\">Order ID: <strong>{reference}</strong></p>\
         <table style=\"width:100%;border-collapse:collapse\">\
         <thead><tr>\
         <th style=\"text-align:left;padding:8px;border-bottom:1px solid #e5e7eb\">Item</th>\
         <th style=\"text-align:center;padding:8px;border-bottom:1px solid #e5e7eb\">Qty</th>\
         <th style=\"text-align:right;padding:8px;border-bottom:1px solid #e5e7eb\">Price</th>\
         </tr></thead><tbody>{item_rows}</tbody></table>\
         <p style=\"text-align:right\">Total: <strong>{amount}</strong></p>\
         <p>We'll email you tracking details when your order ships.</p>\
         </div></div></div>",
        first_name = escape_html(&order.first_name),
        reference = escape_html(&order.reference),
        amount = currency(order.amount),
    );

    OutboundEmail {
        to: order.email.clone(),
        subject: format!("Order confirmed: {}", order.reference),
        text,
        html,
    }
}

pub fn order_status_update(order: &Order, status: OrderStatus) -> OutboundEmail {
    let text = format!(
        "Hi {first_name},\n\nYour order {reference} is now {status}.\n\nYou can check progress any time on the order tracking page.\n",
        first_name = order.first_name,
        reference = order.reference,
    );
    let html = format!(
        "<div style=\"background:#f6f7f9;padding:24px\">\
         <div style=\"max-width:640px;margin:0 auto;background:#fff;border:1px solid #e5e7eb;border-radius:8px\">\
         <div style=\"background:#111827;color:#fff;padding:20px 24px;font-weight:600\">DecknTools</div>\
         <div style=\"padding:24px\">\
         <h1 style=\"margin:0 0 8px 0;font-size:22px\">Order Update</h1>\
         <p>Hi {first_name}, your order <span style=\"font-family:monospace\">{reference}</span> is now <strong>{status}</strong>.</p>\
         </div></div></div>",
        first_name = escape_html(&order.first_name),
        reference = escape_html(&order.reference),
    );

    OutboundEmail {
        to: order.email.clone(),
        subject: format!("Your order {} is {}", order.reference, status),
        text,
        html,
    }
}

fn currency(amount: Decimal) -> String {
    format!("£{:.2}", amount)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn sample_order() -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            reference: "ORD-123456-7890".to_string(),
            email: "jo@example.com".to_string(),
            first_name: "Jo<script>".to_string(),
            last_name: "Bloggs".to_string(),
            address: "1 Deck Lane".to_string(),
            city: "London".to_string(),
            postcode: "E1 1AA".to_string(),
            amount: dec!(140.96),
            status: OrderStatus::Processing,
            items: vec![crate::models::OrderItem {
                name: "Composite Board".to_string(),
                quantity: 2,
                price: dec!(45.99),
                image: None,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn confirmation_escapes_html_and_carries_totals() {
        let email = order_confirmation(&sample_order());
        assert_eq!(email.to, "jo@example.com");
        assert!(email.subject.contains("ORD-123456-7890"));
        assert!(email.html.contains("Jo&lt;script&gt;"));
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("£140.96"));
        assert!(email.text.contains("Total: £140.96"));
    }

    #[test]
    fn status_update_names_the_new_state() {
        let email = order_status_update(&sample_order(), OrderStatus::Shipped);
        assert!(email.subject.ends_with("shipped"));
        assert!(email.text.contains("is now shipped"));
    }
}
