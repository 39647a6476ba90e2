use forecast_core::{DayCard, IconImage, Presenter};
use slint::{Image, ModelRc, Rgba8Pixel, SharedPixelBuffer, VecModel};

slint::slint! {
    import { Button, LineEdit } from "std-widgets.slint";

    export struct DayCardData {
        date: string,
        temperature: string,
        day-icon: image,
        night-icon: image,
    }

    component ForecastCard inherits Rectangle {
        in property <DayCardData> data;

        background: #ffffff;
        border-radius: 12px;
        min-width: 130px;

        VerticalLayout {
            padding: 10px;
            spacing: 10px;
            alignment: start;

            Text {
                text: root.data.date;
                font-size: 14px;
                font-weight: 700;
                color: #2c3e50;
                horizontal-alignment: center;
            }
            Text {
                text: root.data.temperature;
                font-size: 12px;
                color: rgb(52, 73, 94); // #34495e (hex form trips the Rust tokenizer)
                horizontal-alignment: center;
            }
            Image {
                source: root.data.day-icon;
                image-fit: contain;
                height: 45px;
            }
            Image {
                source: root.data.night-icon;
                image-fit: contain;
                height: 45px;
            }
        }
    }

    export component MainWindow inherits Window {
        title: "5-Day Weather Forecast";
        preferred-width: 900px;
        preferred-height: 400px;
        background: #ecf0f1;

        in property <[DayCardData]> cards;
        in property <string> status;
        in property <bool> busy;
        in-out property <string> query <=> city-field.text;

        callback search(string);

        VerticalLayout {
            padding: 20px;
            spacing: 20px;
            alignment: start;

            Rectangle {
                background: #2c3e50;
                border-radius: 6px;

                HorizontalLayout {
                    padding: 10px;
                    spacing: 10px;

                    Text {
                        text: "Enter City Name:";
                        font-size: 14px;
                        color: #ecf0f1;
                        vertical-alignment: center;
                    }
                    city-field := LineEdit {
                        font-size: 14px;
                        placeholder-text: "e.g. Seattle";
                        accepted(text) => {
                            root.search(text);
                        }
                    }
                    Button {
                        text: root.busy ? "Searching..." : "Search";
                        clicked => {
                            root.search(city-field.text);
                        }
                    }
                }
            }

            HorizontalLayout {
                spacing: 20px;
                alignment: center;

                for card in root.cards: ForecastCard {
                    data: card;
                }
            }

            Text {
                text: root.status;
                font-size: 12px;
                color: red;
                horizontal-alignment: center;
            }
        }
    }
}

/// Push the presenter's view into the window. The card model is rebuilt, never patched.
pub fn render(window: &MainWindow, presenter: &Presenter) {
    let view = presenter.view();
    let cards: Vec<DayCardData> = view.cards.iter().map(card_data).collect();

    window.set_cards(ModelRc::new(VecModel::from(cards)));
    window.set_status(view.status.as_deref().unwrap_or_default().into());
    window.set_busy(presenter.is_busy());
}

fn card_data(card: &DayCard) -> DayCardData {
    DayCardData {
        date: card.date_label.as_str().into(),
        temperature: card.temperature_label.as_str().into(),
        day_icon: icon_image(&card.day_icon),
        night_icon: icon_image(&card.night_icon),
    }
}

fn icon_image(icon: &IconImage) -> Image {
    let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
        icon.pixels.as_raw(),
        icon.width(),
        icon.height(),
    );
    Image::from_rgba8(buffer)
}
